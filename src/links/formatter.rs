use super::resolver::TitleResolver;
use super::truncate::{frame_budget, truncate_utf8};
use super::types::{OutboundFrame, ReplyBatch};
use std::collections::HashSet;

/// Turns one inbound chat message into the reply lines the bot sends.
///
/// Stateless across messages: each call builds its own [`ReplyBatch`].
#[derive(Clone)]
pub struct MessageFormatter {
    resolver: TitleResolver,
    allowed_channels: HashSet<String>,
    max_line_bytes: usize,
}

impl MessageFormatter {
    pub fn new(
        resolver: TitleResolver,
        allowed_channels: impl IntoIterator<Item = String>,
        max_line_bytes: usize,
    ) -> Self {
        Self {
            resolver,
            allowed_channels: allowed_channels.into_iter().collect(),
            max_line_bytes,
        }
    }

    pub fn is_allowed_channel(&self, target: &str) -> bool {
        self.allowed_channels.contains(target)
    }

    /// Resolve every link in `text` and shape the replies for `target`.
    ///
    /// Messages the bot sent itself, and messages outside the monitored
    /// channels, produce nothing.
    pub async fn format(
        &self,
        text: &str,
        target: &str,
        sender_is_self: bool,
    ) -> Vec<OutboundFrame> {
        if sender_is_self || !self.is_allowed_channel(target) {
            return Vec::new();
        }

        let batch = self.collect(text, target).await;
        shape_replies(target, batch, self.max_line_bytes)
    }

    /// Resolve each token in source order and keep the frame-safe titles.
    pub async fn collect(&self, text: &str, target: &str) -> ReplyBatch {
        let mut batch = ReplyBatch::new();

        for token in super::detector::tokenize(text) {
            tracing::debug!(token, "parsing URL");

            let Some(title) = self.resolver.resolve(token).await else {
                tracing::debug!(token, "no title could be parsed");
                continue;
            };

            let budget = frame_budget(self.max_line_bytes, target);
            batch.insert(token, fit_to_frame(&title, budget, self.max_line_bytes));
        }

        batch
    }
}

/// Cut `text` to `budget` bytes at a char boundary, logging when it shrinks.
fn fit_to_frame(text: &str, budget: usize, max_line_bytes: usize) -> String {
    let fitted = truncate_utf8(text, budget);
    if fitted.len() != text.len() {
        tracing::warn!(
            original_bytes = text.len(),
            truncated_bytes = fitted.len(),
            max_line_bytes,
            "truncated title to fit the line limit"
        );
    }
    fitted.to_string()
}

/// A lone link gets its bare title; several links get `"<url>: <title>"`
/// each, in source order. Every text fits `PRIVMSG <target> :<text>\n`
/// within `max_line_bytes`; the title is what gets cut.
pub fn shape_replies(
    target: &str,
    batch: ReplyBatch,
    max_line_bytes: usize,
) -> Vec<OutboundFrame> {
    let budget = frame_budget(max_line_bytes, target);
    let frame = |text: String| OutboundFrame {
        target: target.to_string(),
        text: fit_to_frame(&text, budget, max_line_bytes),
    };

    if batch.len() == 1 {
        return batch
            .into_entries()
            .into_iter()
            .map(|(_, title)| frame(title))
            .collect();
    }

    batch
        .into_entries()
        .into_iter()
        .map(|(url, title)| frame(format!("{url}: {title}")))
        .collect()
}
