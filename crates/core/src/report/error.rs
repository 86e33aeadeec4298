//! Report composition errors.

use thiserror::Error;

/// Composition errors. Any of them aborts the export.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// No building or project context was supplied.
    #[error("Report context is missing")]
    MissingContext,

    /// Building mode with no building selected.
    #[error("No building selected")]
    EmptySelection,
}
