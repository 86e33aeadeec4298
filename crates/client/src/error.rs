//! Client error types.

use propledger_shared::AppError;
use thiserror::Error;

/// Errors raised while talking to the REST API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client could not be built from configuration.
    #[error("client configuration error: {0}")]
    Configuration(String),

    /// Request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        match (err.status(), err.url()) {
            (Some(status), Some(url)) if status == reqwest::StatusCode::NOT_FOUND => {
                Self::NotFound(url.to_string())
            }
            (Some(status), url) => Self::Status {
                status: status.as_u16(),
                url: url.map(ToString::to_string).unwrap_or_default(),
            },
            (None, _) => Self::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Configuration(msg) => Self::Configuration(msg),
            ClientError::Decode(msg) => Self::Data(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}
