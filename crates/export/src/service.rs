//! Export service: report + attachments → archive.

use std::sync::Arc;

use propledger_client::DocumentStore;
use propledger_core::records::AttachmentRef;
use propledger_core::report::ReportDocument;
use tracing::{debug, info, warn};

use crate::archive::{ArchiveBuilder, ExportArchive, archive_filename, sanitize_filename};
use crate::error::ExportError;
use crate::plan::FolderPlan;
use crate::render::DocumentRenderer;

/// Packages a report and its attachments.
pub struct ExportService<D> {
    renderer: Arc<dyn DocumentRenderer>,
    store: D,
}

impl<D: DocumentStore> ExportService<D> {
    /// Creates a service.
    pub fn new(renderer: Arc<dyn DocumentRenderer>, store: D) -> Self {
        Self { renderer, store }
    }

    /// Builds the archive.
    ///
    /// The report is rendered before anything else, on the blocking thread
    /// pool, so a rendering failure produces no archive. Folders are created next, then the report is
    /// placed at the root, then attachments are fetched one at a time in
    /// reference order. A failed fetch becomes a warning.
    ///
    /// # Errors
    ///
    /// Rendering or archive write failures.
    pub async fn export(
        &self,
        doc: &ReportDocument,
        attachments: &[AttachmentRef],
        plan: &FolderPlan,
    ) -> Result<ExportArchive, ExportError> {
        let renderer = Arc::clone(&self.renderer);
        let document = doc.clone();
        let rendered = tokio::task::spawn_blocking(move || renderer.render(&document))
            .await
            .map_err(|e| ExportError::rendering(format!("renderer task failed: {e}")))??;
        let filename = archive_filename(&doc.subject, &doc.period);

        let mut builder = ArchiveBuilder::new();
        for folder in plan.folders() {
            builder.add_folder(folder)?;
        }
        let report_name = format!(
            "{}.{}",
            filename.trim_end_matches(".zip"),
            rendered.extension
        );
        builder.add_file(&report_name, &rendered.bytes)?;

        let mut warnings = Vec::new();
        let mut attachment_count = 0;
        for attachment in attachments {
            let Some(folder) = plan.folder_for(attachment) else {
                warn!(document_id = %attachment.document_id, "Attachment has no folder");
                warnings.push(format!(
                    "Document {} hors du plan de dossiers",
                    attachment.document_id
                ));
                continue;
            };

            match self.store.fetch_document(&attachment.document_id).await {
                Ok(content) => {
                    let path = format!("{folder}/{}", attachment_name(attachment));
                    let stored = builder.add_file(&path, &content)?;
                    debug!(path = %stored, size = content.len(), "Attachment added");
                    attachment_count += 1;
                }
                Err(e) => {
                    warn!(
                        document_id = %attachment.document_id,
                        record_id = %attachment.record_id,
                        error = %e,
                        "Attachment skipped"
                    );
                    warnings.push(format!(
                        "Document {} non inclus: {e}",
                        attachment.document_id
                    ));
                }
            }
        }

        let bytes = builder.finish()?;
        info!(
            filename = %filename,
            size = bytes.len(),
            attachments = attachment_count,
            skipped = warnings.len(),
            "Archive built"
        );

        Ok(ExportArchive {
            filename,
            bytes,
            attachment_count,
            warnings,
        })
    }
}

/// `{record}_{document}.pdf`, sanitized.
fn attachment_name(attachment: &AttachmentRef) -> String {
    sanitize_filename(&format!(
        "{}_{}.pdf",
        attachment.record_id, attachment.document_id
    ))
}
