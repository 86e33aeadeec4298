//! Report export for Propledger.
//!
//! Renders composed reports (docx or PDF), packages them with their
//! attachments into a ZIP archive laid out by a fixed folder plan, and
//! delivers the archive to local or S3-compatible storage. The pipeline
//! module ties fetching, aggregation and export together.

pub mod archive;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod service;
pub mod sink;

#[cfg(test)]
mod fixtures;

pub use archive::{ArchiveBuilder, ExportArchive, archive_filename, sanitize_filename};
pub use error::ExportError;
pub use pipeline::{AnalysisPipeline, AnalysisRun, ExportOutcome, PipelineSettings};
pub use plan::FolderPlan;
pub use render::{DocumentRenderer, DocxRenderer, PdfRenderer, RenderedDocument, renderer_for};
pub use service::ExportService;
pub use sink::ArchiveSink;
