use crate::channels::traits::{Channel, ChannelMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Reconnect delay that doubles after every restart, up to a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(Duration::from_millis(1));
        Self {
            initial,
            max: max.max(initial),
            current: initial,
        }
    }

    /// Delay to wait now; the next call returns double, capped.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_BACKOFF)
    }
}

/// Keep `ch.listen` running until the receiving side of `tx` goes away.
///
/// A listener that returns cleanly had a working session, so the delay
/// starts over; errors grow it.
pub fn spawn_supervised_listener(
    ch: Arc<dyn Channel>,
    tx: mpsc::Sender<ChannelMessage>,
    mut backoff: Backoff,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let component = format!("channel:{}", ch.name());

        loop {
            tracing::debug!(component, "channel listener starting");
            let result = ch.listen(tx.clone()).await;

            if tx.is_closed() {
                tracing::debug!(component, "dispatcher gone; listener stopping");
                break;
            }

            match result {
                Ok(()) => {
                    tracing::warn!("Channel {} exited unexpectedly; restarting", ch.name());
                    backoff.reset();
                }
                Err(e) => {
                    tracing::error!("Channel {} error: {e:#}; restarting", ch.name());
                }
            }

            let delay = backoff.next_delay();
            tracing::info!(component, delay_secs = delay.as_secs_f64(), "reconnecting");
            tokio::time::sleep(delay).await;
        }
    })
}
