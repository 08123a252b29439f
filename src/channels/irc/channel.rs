use crate::channels::traits::{Channel, ChannelMessage};
use crate::config::IrcConfig;
use crate::error::TransportError;
use crate::links::truncate::frame_budget;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};

// Use tokio_rustls's re-export of rustls types
use tokio_rustls::rustls;

use super::auth::encode_sasl_plain;
use super::message::split_message;
use super::parse::{IrcMessage, privmsg_text};
use super::tls::NoVerify;

/// Read timeout for IRC: if no data arrives within this duration, the
/// connection is considered dead. IRC servers typically PING every 60-120s.
const READ_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(300);

/// Line terminator. The reply budget counts exactly one byte for it.
const LINE_END: &str = "\n";

/// Monotonic counter to ensure unique message IDs under burst traffic.
static MSG_SEQ: AtomicU64 = AtomicU64::new(0);

pub(super) type LineWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// IRC over TLS channel.
///
/// Connects to an IRC server using TLS, joins the configured channels and
/// forwards every PRIVMSG it sees to the dispatch loop.
pub struct IrcChannel {
    pub(super) server: String,
    pub(super) port: u16,
    pub(super) nickname: String,
    pub(super) username: String,
    pub(super) autojoins: Vec<String>,
    pub(super) server_password: Option<String>,
    pub(super) nickserv_password: Option<String>,
    pub(super) sasl_password: Option<String>,
    pub(super) verify_tls: bool,
    pub(super) max_line_bytes: usize,
    /// Shared write half of the connection for sending messages.
    writer: Arc<Mutex<Option<LineWriter>>>,
}

impl IrcChannel {
    pub fn new(config: &IrcConfig, max_line_bytes: usize) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            nickname: config.nickname.clone(),
            username: config
                .username
                .clone()
                .unwrap_or_else(|| config.nickname.clone()),
            autojoins: config.autojoins.clone(),
            server_password: config.server_password.clone(),
            nickserv_password: config.nickserv_password.clone(),
            sasl_password: config.sasl_password.clone(),
            verify_tls: config.verify_tls.unwrap_or(true),
            max_line_bytes,
            writer: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a TLS connection to the IRC server.
    async fn connect(
        &self,
    ) -> anyhow::Result<tokio_rustls::client::TlsStream<tokio::net::TcpStream>> {
        let addr = format!("{}:{}", self.server, self.port);
        let tcp = tokio::net::TcpStream::connect(&addr).await?;

        let tls_config = if self.verify_tls {
            let root_store: rustls::RootCertStore =
                webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
            rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth()
        } else {
            rustls::ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerify))
                .with_no_client_auth()
        };

        let connector = tokio_rustls::TlsConnector::from(Arc::new(tls_config));
        let domain = rustls::pki_types::ServerName::try_from(self.server.clone())?;
        let tls = connector.connect(domain, tcp).await?;

        Ok(tls)
    }

    /// Send a raw IRC line (appends the line terminator).
    async fn send_raw(writer: &mut LineWriter, line: &str) -> anyhow::Result<()> {
        let data = format!("{line}{LINE_END}");
        writer.write_all(data.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Send a raw line through the shared writer.
    async fn write_line(&self, line: &str) -> anyhow::Result<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or_else(|| TransportError::Send {
            channel: "irc".into(),
            message: "not connected".into(),
        })?;
        Self::send_raw(writer, line).await
    }

    #[cfg(test)]
    pub(super) async fn set_writer(&self, writer: Option<LineWriter>) {
        *self.writer.lock().await = writer;
    }

    /// Drive one registered session over an established connection until
    /// the server goes away or `tx` is closed.
    pub(super) async fn run_session<R>(
        &self,
        reader: R,
        writer: LineWriter,
        tx: &mpsc::Sender<ChannelMessage>,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        *self.writer.lock().await = Some(writer);
        let result = self.session_loop(reader, tx).await;
        *self.writer.lock().await = None;
        result
    }

    #[allow(clippy::too_many_lines)]
    async fn session_loop<R>(
        &self,
        mut reader: R,
        tx: &mpsc::Sender<ChannelMessage>,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let mut current_nick = self.nickname.clone();

        // ── SASL negotiation ──
        if self.sasl_password.is_some() {
            self.write_line("CAP REQ :sasl").await?;
        }

        // ── Server password ──
        if let Some(ref pass) = self.server_password {
            self.write_line(&format!("PASS {pass}")).await?;
        }

        // ── Nick/User registration ──
        self.write_line(&format!("NICK {current_nick}")).await?;
        self.write_line(&format!("USER {} 0 * :{}", self.username, self.nickname))
            .await?;

        let mut line = String::new();
        let mut registered = false;
        let mut sasl_pending = self.sasl_password.is_some();

        loop {
            line.clear();
            let n = tokio::time::timeout(READ_TIMEOUT, reader.read_line(&mut line))
                .await
                .map_err(|_| {
                    anyhow::anyhow!("IRC read timed out (no data for {READ_TIMEOUT:?})")
                })??;
            if n == 0 {
                return Err(TransportError::Connection {
                    channel: "irc".into(),
                    message: "connection closed by server".into(),
                }
                .into());
            }

            let Some(msg) = IrcMessage::parse(&line) else {
                continue;
            };

            match msg.command.as_str() {
                "PING" => {
                    let token = msg.params.first().map_or("", String::as_str);
                    self.write_line(&format!("PONG :{token}")).await?;
                }

                // CAP responses for SASL
                "CAP" => {
                    if sasl_pending && msg.params.iter().any(|p| p.contains("sasl")) {
                        if msg.params.iter().any(|p| p == "ACK") {
                            self.write_line("AUTHENTICATE PLAIN").await?;
                        } else if msg.params.iter().any(|p| p == "NAK") {
                            tracing::warn!(
                                "IRC server does not support SASL, continuing without it"
                            );
                            sasl_pending = false;
                            self.write_line("CAP END").await?;
                        }
                    }
                }

                "AUTHENTICATE" => {
                    // Server sends "AUTHENTICATE +" to request credentials
                    if sasl_pending && msg.params.first().is_some_and(|p| p == "+") {
                        let encoded = encode_sasl_plain(
                            &current_nick,
                            self.sasl_password.as_deref().unwrap_or(""),
                        );
                        self.write_line(&format!("AUTHENTICATE {encoded}")).await?;
                    }
                }

                // RPL_SASLSUCCESS (903): SASL done, end CAP
                "903" => {
                    sasl_pending = false;
                    self.write_line("CAP END").await?;
                }

                // SASL failure (904, 905, 906, 907)
                "904" | "905" | "906" | "907" => {
                    tracing::warn!("IRC SASL authentication failed ({})", msg.command);
                    sasl_pending = false;
                    self.write_line("CAP END").await?;
                }

                // RPL_WELCOME: registration complete
                "001" => {
                    registered = true;
                    if let Some(nick) = msg.params.first() {
                        current_nick.clone_from(nick);
                    }
                    tracing::info!("IRC registered as {}", current_nick);

                    if let Some(ref pass) = self.nickserv_password {
                        self.write_line(&format!("PRIVMSG NickServ :IDENTIFY {pass}"))
                            .await?;
                    }

                    for chan in &self.autojoins {
                        self.write_line(&format!("JOIN {chan}")).await?;
                    }
                }

                // ERR_NICKNAMEINUSE (433)
                "433" => {
                    let alt = format!("{current_nick}_");
                    tracing::warn!("IRC nickname {current_nick} is in use, trying {alt}");
                    self.write_line(&format!("NICK {alt}")).await?;
                    current_nick = alt;
                }

                // Our own nick change (services or a retried registration)
                "NICK" => {
                    if msg
                        .nick()
                        .is_some_and(|n| n.eq_ignore_ascii_case(&current_nick))
                        && let Some(new_nick) = msg.params.first()
                    {
                        current_nick.clone_from(new_nick);
                    }
                }

                "PRIVMSG" => {
                    if !registered {
                        continue;
                    }

                    let target = msg.params.first().map_or("", String::as_str);
                    let body = msg.params.get(1).map_or("", String::as_str);
                    let sender_nick = msg.nick().unwrap_or("unknown");

                    // Skip messages from NickServ/ChanServ
                    if sender_nick.eq_ignore_ascii_case("NickServ")
                        || sender_nick.eq_ignore_ascii_case("ChanServ")
                    {
                        continue;
                    }

                    let Some(text) = privmsg_text(body) else {
                        continue;
                    };

                    let seq = MSG_SEQ.fetch_add(1, Ordering::Relaxed);
                    let channel_msg = ChannelMessage {
                        id: format!("irc_{}_{seq}", chrono::Utc::now().timestamp_millis()),
                        sender: sender_nick.to_string(),
                        target: target.to_string(),
                        content: text.to_string(),
                        from_self: sender_nick.eq_ignore_ascii_case(&current_nick),
                    };

                    if tx.send(channel_msg).await.is_err() {
                        return Ok(());
                    }
                }

                // ERR_PASSWDMISMATCH (464) or other fatal errors
                "464" => {
                    anyhow::bail!("IRC password mismatch");
                }

                "ERROR" => {
                    let reason = msg.params.last().map_or("", String::as_str);
                    return Err(TransportError::Connection {
                        channel: "irc".into(),
                        message: format!("server closed the link: {reason}"),
                    }
                    .into());
                }

                _ => {}
            }
        }
    }
}

impl Channel for IrcChannel {
    fn name(&self) -> &str {
        "irc"
    }

    fn send<'a>(
        &'a self,
        message: &'a str,
        recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let max_payload = frame_budget(self.max_line_bytes, recipient);
            for chunk in split_message(message, max_payload) {
                self.write_line(&format!("PRIVMSG {recipient} :{chunk}"))
                    .await?;
            }
            Ok(())
        })
    }

    fn listen<'a>(
        &'a self,
        tx: mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            tracing::info!(
                "IRC channel connecting to {}:{} as {}...",
                self.server,
                self.port,
                self.nickname
            );

            let tls = self.connect().await?;
            let (reader, writer) = tokio::io::split(tls);
            self.run_session(BufReader::new(reader), Box::new(writer), &tx)
                .await
        })
    }

    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        // Lightweight connectivity check: TLS connect + QUIT
        Box::pin(async move {
            match self.connect().await {
                Ok(tls) => {
                    let (_, writer) = tokio::io::split(tls);
                    let mut writer: LineWriter = Box::new(writer);
                    let _ = Self::send_raw(&mut writer, "QUIT :health check").await;
                    true
                }
                Err(e) => {
                    tracing::debug!(error = %e, "IRC health check failed");
                    false
                }
            }
        })
    }
}
