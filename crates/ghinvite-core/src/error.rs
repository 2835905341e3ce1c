//! Error types for ghinvite-core

/// Result type alias for ghinvite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ghinvite operations
///
/// Remote rejections from the invitation endpoints never surface here; they
/// are classified into an [`InvitationOutcome`](crate::types::InvitationOutcome).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Slack Web API reported `ok: false`
    #[error("Slack API error: {0}")]
    Slack(String),

    /// Workflow step contract violation (unknown callback, bad inputs)
    #[error("Step error: {0}")]
    Step(String),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the URL, never headers, so the token stays out
        Error::Http(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

/// Fieldless error category for cheap matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Configuration error
    Config,
    /// HTTP transport error
    Http,
    /// Slack API error
    Slack,
    /// Step contract error
    Step,
    /// JSON error
    Json,
    /// I/O operation error
    Io,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Http(_) => ErrorKind::Http,
            Error::Slack(_) => ErrorKind::Slack,
            Error::Step(_) => ErrorKind::Step,
            Error::Json(_) => ErrorKind::Json,
            Error::Io(_) => ErrorKind::Io,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Borrow the error message without the category prefix.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Config(msg)
            | Error::Http(msg)
            | Error::Slack(msg)
            | Error::Step(msg)
            | Error::Json(msg)
            | Error::Other(msg) => msg,
            Error::Io(_) => "I/O error",
        }
    }
}
