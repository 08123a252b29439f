use tokio::time::error::Elapsed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChannelHealthState {
    Healthy,
    Unhealthy,
    Timeout,
}

impl ChannelHealthState {
    pub(crate) fn from_probe(result: &Result<bool, Elapsed>) -> Self {
        match result {
            Ok(true) => Self::Healthy,
            Ok(false) => Self::Unhealthy,
            Err(_) => Self::Timeout,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Timeout => "timed out",
        }
    }
}
