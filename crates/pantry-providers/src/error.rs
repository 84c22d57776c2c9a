//! Provider call errors.

use thiserror::Error;

/// Why a single provider call produced no usable text.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS, or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not JSON.
    #[error("malformed response body: {message}")]
    MalformedBody { status: u16, message: String },

    /// Body was JSON but had no text at the expected path.
    #[error("no generated text at {pointer}")]
    MissingText { status: u16, pointer: &'static str },
}

impl ProviderError {
    /// HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Transport(e) => e.status().map(|s| s.as_u16()),
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::MalformedBody { status, .. } => Some(*status),
            ProviderError::MissingText { status, .. } => Some(*status),
        }
    }
}
