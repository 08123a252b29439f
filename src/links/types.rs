use serde::{Deserialize, Serialize};

/// Browser-like agent; some sites refuse requests from default or bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/62.0.3202.62 Safari/537.36";

/// Hard IRC line limit, framing and terminator included.
pub const DEFAULT_MAX_LINE_BYTES: usize = 512;

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_request_timeout_secs() -> u64 {
    3
}
fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}
fn default_max_concurrent_messages() -> usize {
    8
}

/// HTTP and reply-shaping policy for link titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// `User-Agent` sent with every HEAD/GET
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout; HEAD and GET each get the full budget
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Outbound protocol line limit
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
    /// Inbound messages resolved at the same time
    #[serde(default = "default_max_concurrent_messages")]
    pub max_concurrent_messages: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            max_line_bytes: default_max_line_bytes(),
            max_concurrent_messages: default_max_concurrent_messages(),
        }
    }
}

/// One line the bot will send: `text` addressed to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub target: String,
    pub text: String,
}

/// Resolved titles for one inbound message, keyed by the raw token.
///
/// Keys are unique: inserting a token again keeps its original position and
/// replaces the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyBatch {
    entries: Vec<(String, String)>,
}

impl ReplyBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, title: impl Into<String>) {
        let token = token.into();
        let title = title.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = title,
            None => self.entries.push((token, title)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}
