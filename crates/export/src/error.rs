//! Export error types.

use propledger_core::report::ReportError;
use propledger_shared::AppError;
use thiserror::Error;

/// Errors that abort an export. Attachment failures never reach this type;
/// they become warnings on the archive.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Report structure could not be built.
    #[error("report composition failed: {0}")]
    Composition(#[from] ReportError),

    /// Report could not be serialized.
    #[error("report rendering failed: {0}")]
    Rendering(String),

    /// PDF font files are missing.
    #[error("font '{family}' not found in {dir}")]
    FontNotFound {
        /// Font family.
        family: String,
        /// Searched directory.
        dir: String,
    },

    /// ZIP archive could not be written.
    #[error("archive write failed: {0}")]
    Archive(String),

    /// Destination misconfigured.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Archive could not be delivered.
    #[error("storage operation failed: {0}")]
    Storage(String),
}

impl ExportError {
    /// Create a rendering error.
    #[must_use]
    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Archive(err.to_string())
    }
}

impl From<opendal::Error> for ExportError {
    fn from(err: opendal::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Composition(e) => Self::Composition(e.to_string()),
            e @ (ExportError::Rendering(_) | ExportError::FontNotFound { .. }) => {
                Self::Rendering(e.to_string())
            }
            ExportError::Archive(msg) => Self::Internal(msg),
            ExportError::Configuration(msg) => Self::Configuration(msg),
            ExportError::Storage(msg) => Self::Storage(msg),
        }
    }
}
