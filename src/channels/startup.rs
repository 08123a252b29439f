use crate::config::Config;
use crate::error::Result;
use crate::links::{HttpFetch, MessageFormatter, ReqwestFetcher, TitleResolver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use super::health::ChannelHealthState;
use super::irc::IrcChannel;
use super::runtime::{Backoff, spawn_supervised_listener};
use super::traits::{Channel, ChannelMessage};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const INBOUND_QUEUE_DEPTH: usize = 100;

/// Build the formatter the way `run` wires it: real HTTP, the configured
/// autojoins as the watched channels.
pub fn build_formatter(config: &Config) -> Result<MessageFormatter> {
    let http: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(&config.links)?);
    Ok(MessageFormatter::new(
        TitleResolver::new(http),
        config.allowed_channels(),
        config.links.max_line_bytes,
    ))
}

/// Connect, listen and answer links until Ctrl-C.
pub async fn start_channels(config: Arc<Config>) -> Result<()> {
    let formatter = Arc::new(build_formatter(&config)?);
    let channel: Arc<dyn Channel> =
        Arc::new(IrcChannel::new(&config.irc, config.links.max_line_bytes));

    println!("◆ linkbot");
    println!("  › server   {}:{}", config.irc.server, config.irc.port);
    println!("  › nickname {}", config.irc.nickname);
    println!("  › watching {}", config.irc.autojoins.join(", "));
    println!();

    let (tx, rx) = mpsc::channel::<ChannelMessage>(INBOUND_QUEUE_DEPTH);
    let listener = spawn_supervised_listener(Arc::clone(&channel), tx, Backoff::default());

    tokio::select! {
        () = dispatch(rx, formatter, channel, config.links.max_concurrent_messages) => {
            tracing::warn!("inbound queue closed");
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::warn!("unable to listen for shutdown signal: {e}");
            }
            tracing::info!("shutting down");
        }
    }

    listener.abort();
    Ok(())
}

/// Probe the configured server once and print the outcome.
pub async fn doctor_channels(config: Arc<Config>) -> anyhow::Result<()> {
    let channel = IrcChannel::new(&config.irc, config.links.max_line_bytes);

    println!("Channel doctor:");
    println!();

    let result = tokio::time::timeout(HEALTH_CHECK_TIMEOUT, channel.health_check()).await;
    let state = ChannelHealthState::from_probe(&result);
    println!("  {} {:<9} {}", marker(state), channel.name(), state.label());

    if state != ChannelHealthState::Healthy {
        anyhow::bail!(
            "{}:{} is {}",
            config.irc.server,
            config.irc.port,
            state.label()
        );
    }
    Ok(())
}

fn marker(state: ChannelHealthState) -> char {
    match state {
        ChannelHealthState::Healthy => '+',
        ChannelHealthState::Unhealthy => '-',
        ChannelHealthState::Timeout => '!',
    }
}

/// Answer every inbound message on its own task, at most `max_in_flight`
/// at a time. Returns once the inbound queue closes and the tasks drain.
pub async fn dispatch(
    mut rx: mpsc::Receiver<ChannelMessage>,
    formatter: Arc<MessageFormatter>,
    channel: Arc<dyn Channel>,
    max_in_flight: usize,
) {
    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(msg) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let formatter = Arc::clone(&formatter);
        let channel = Arc::clone(&channel);
        tasks.spawn(async move {
            let _permit = permit;
            handle_message(&formatter, channel.as_ref(), &msg).await;
        });

        while let Some(done) = tasks.try_join_next() {
            if let Err(e) = done {
                tracing::error!("message task failed: {e}");
            }
        }
    }

    while let Some(done) = tasks.join_next().await {
        if let Err(e) = done {
            tracing::error!("message task failed: {e}");
        }
    }
}

/// Format one message and send its replies. Returns how many went out.
pub async fn handle_message(
    formatter: &MessageFormatter,
    channel: &dyn Channel,
    msg: &ChannelMessage,
) -> usize {
    tracing::debug!(
        channel = channel.name(),
        sender = %msg.sender,
        reply_to = %msg.target,
        id = %msg.id,
        "inbound message"
    );

    let frames = formatter
        .format(&msg.content, &msg.target, msg.from_self)
        .await;

    let mut sent = 0;
    for frame in &frames {
        match channel.send(&frame.text, &frame.target).await {
            Ok(()) => sent += 1,
            Err(e) => {
                tracing::error!(to = %frame.target, "failed to send reply: {e:#}");
            }
        }
    }
    sent
}
