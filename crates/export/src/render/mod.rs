//! Report renderers.
//!
//! A [`ReportDocument`] is format-agnostic; each renderer walks its sections
//! and blocks and produces the bytes of one output format.

mod docx;
mod pdf;

pub use docx::DocxRenderer;
pub use pdf::PdfRenderer;

use std::sync::Arc;

use propledger_core::report::ReportDocument;
use propledger_shared::config::{DocumentFormat, ExportConfig};

use crate::error::ExportError;

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// File bytes.
    pub bytes: Vec<u8>,
    /// Extension without the dot.
    pub extension: &'static str,
}

/// Serializes a report document to one output format.
pub trait DocumentRenderer: Send + Sync {
    /// Output format.
    fn format(&self) -> DocumentFormat;

    /// Renders the document.
    fn render(&self, doc: &ReportDocument) -> Result<RenderedDocument, ExportError>;
}

/// Renderer selected by the export configuration.
#[must_use]
pub fn renderer_for(config: &ExportConfig) -> Arc<dyn DocumentRenderer> {
    match config.document_format {
        DocumentFormat::Docx => Arc::new(DocxRenderer),
        DocumentFormat::Pdf => Arc::new(PdfRenderer::new(
            config.font_dir.clone(),
            config.font_family.clone(),
        )),
    }
}
