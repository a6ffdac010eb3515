//! Errors returned by [`crate::Backend`] implementations.

use thiserror::Error;

/// A failed backend call.
///
/// The carried detail is for logs only; views reduce every variant to a fixed
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("not authenticated")]
    Unauthenticated,

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Status code of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthenticated => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
