//! Error taxonomy and the telemetry sink seam.

use crate::TelemetryEvent;

/// Every failure surfaced by the memory clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or contradictory client configuration; raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The startup probe rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Connection refused, DNS failure, timeout.
    #[error("request failed: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl ClientError {
    /// True for failures of the HTTP exchange itself (transport or status).
    pub fn is_api_error(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Status { .. })
    }

    /// HTTP status of a `Status` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Fire-and-forget receiver of usage events.
///
/// Implementations must return promptly and must not panic: `capture` is
/// called on the request path after every successful operation, and nothing
/// it does may change the outcome of that operation.
pub trait TelemetrySink: Send + Sync {
    fn capture(&self, event: TelemetryEvent);
}
