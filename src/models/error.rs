#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// The request never produced a response (network, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request failed with status {status}")]
    RemoteRequest { status: u16 },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// The category is known but its series has not been fetched yet.
    #[error("No data loaded for category: {0}")]
    NotLoaded(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl AppError {
    /// Returns the HTTP status for `RemoteRequest` errors.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status } => Some(*status),
            _ => None,
        }
    }

    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RemoteRequest { status: 429 })
    }
}
