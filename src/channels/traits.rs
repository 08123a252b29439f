use std::future::Future;
use std::pin::Pin;

/// A message received from a channel.
///
/// `sender` identifies the user (IRC nick). `target` is where the message
/// was posted and where replies go (an IRC channel, or the bot's own nick
/// for private messages).
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub id: String,
    pub sender: String,
    pub target: String,
    pub content: String,
    /// The bot itself sent this message (echoed back by the server).
    pub from_self: bool,
}

/// A chat transport the bot can listen on and reply through.
pub trait Channel: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Send a message through this channel
    fn send<'a>(
        &'a self,
        message: &'a str,
        recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

    /// Start listening for incoming messages (long-running)
    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

    /// Check if channel is healthy
    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move { true })
    }
}
