use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `linkbot`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the binary and transport glue continue
/// to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum LinkbotError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Transport / Channel ─────────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Title resolution errors ────────────────────────────────────────────────

/// Every way a single URL token can fail to produce a title.
///
/// None of these ever reach the chat: the resolver logs them and the token
/// simply yields no reply.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unable to parse URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("token has no URL scheme")]
    MissingScheme,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("unable to fetch URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("not an HTML page (content-type: {})", .0.as_deref().unwrap_or("<none>"))]
    UnsupportedContentType(Option<String>),

    #[error("unable to parse the HTML: {0}")]
    HtmlParse(String),

    #[error("no title found")]
    NoTitle,
}

impl ResolveError {
    /// Whether this failure deserves an error-level log line. Everything
    /// else is routine (plain words, images, pages without titles).
    pub fn is_noisy(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::Fetch(_) | Self::HtmlParse(_)
        )
    }
}

/// Transport-level HTTP failure (timeout, refused connection, DNS, non-2xx).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(err.to_string())
        }
    }
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel {channel} connection failed: {message}")]
    Connection { channel: String, message: String },

    #[error("channel {channel} send failed: {message}")]
    Send { channel: String, message: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, LinkbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = LinkbotError::Config(ConfigError::Validation("irc.server is empty".into()));
        assert!(err.to_string().contains("validation failed"));
        assert!(err.to_string().contains("irc.server"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: LinkbotError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }

    #[test]
    fn unsupported_content_type_displays_header() {
        let err = ResolveError::UnsupportedContentType(Some("image/png".into()));
        assert!(err.to_string().contains("image/png"));

        let err = ResolveError::UnsupportedContentType(None);
        assert!(err.to_string().contains("<none>"));
    }

    #[test]
    fn fetch_error_wraps_into_resolve_error() {
        let err: ResolveError = FetchError::Status(404).into();
        assert!(err.to_string().contains("404"));
        assert!(err.is_noisy());
    }

    #[test]
    fn routine_failures_are_quiet() {
        assert!(!ResolveError::MissingScheme.is_noisy());
        assert!(!ResolveError::UnsupportedScheme("ftp".into()).is_noisy());
        assert!(!ResolveError::UnsupportedContentType(None).is_noisy());
        assert!(!ResolveError::NoTitle.is_noisy());
        assert!(
            ResolveError::InvalidUrl {
                url: "http://[".into(),
                message: "invalid IPv6 address".into(),
            }
            .is_noisy()
        );
    }

    #[test]
    fn transport_send_displays_channel() {
        let err = LinkbotError::Transport(TransportError::Send {
            channel: "irc".into(),
            message: "not connected".into(),
        });
        assert!(err.to_string().contains("irc"));
        assert!(err.to_string().contains("not connected"));
    }
}
