//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation error on caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// REST API or document store unreachable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed financial data.
    #[error("Data error: {0}")]
    Data(String),

    /// Report structure could not be built.
    #[error("Composition error: {0}")]
    Composition(String),

    /// Report could not be serialized to a document.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Archive could not be written or delivered.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code used in logs and user-facing messages.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Data(_) => "DATA_ERROR",
            Self::Composition(_) => "COMPOSITION_ERROR",
            Self::Rendering(_) => "RENDERING_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the pipeline can continue with reduced input.
    ///
    /// Transport and data errors degrade to empty or partial results; every
    /// other kind aborts the operation that raised it.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Data(_))
    }
}
