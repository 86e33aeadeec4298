//! In-memory ZIP archive builder.

use std::collections::BTreeSet;
use std::io::{Cursor, Write as _};

use bytes::Bytes;
use propledger_shared::types::AnalysisPeriod;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportArchive {
    /// Archive filename, e.g. `rapport_Le_Plateau_2025-01_2025-03.zip`.
    pub filename: String,
    /// ZIP bytes.
    pub bytes: Bytes,
    /// Attachments placed in the archive.
    pub attachment_count: usize,
    /// Degradations the user should know about.
    pub warnings: Vec<String>,
}

impl ExportArchive {
    /// Returns true when the export is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Builds one archive. Each export owns its builder.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    directories: BTreeSet<String>,
    files: BTreeSet<String>,
}

impl ArchiveBuilder {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            directories: BTreeSet::new(),
            files: BTreeSet::new(),
        }
    }

    /// Adds a folder and its missing parents.
    pub fn add_folder(&mut self, path: &str) -> Result<(), ExportError> {
        let mut prefix = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            prefix.push_str(part);
            prefix.push('/');
            if self.directories.insert(prefix.clone()) {
                self.writer.add_directory(prefix.as_str(), self.options)?;
            }
        }
        Ok(())
    }

    /// Adds a file, creating its folder. A taken name gets a `-2`, `-3`...
    /// suffix before the extension. Returns the stored path.
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<String, ExportError> {
        if let Some((folder, _)) = path.rsplit_once('/') {
            self.add_folder(folder)?;
        }
        let path = self.unique_path(path);
        self.writer.start_file(path.as_str(), self.options)?;
        self.writer.write_all(content)?;
        self.files.insert(path.clone());
        Ok(path)
    }

    /// Number of files added so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Finishes the archive and returns its bytes.
    pub fn finish(self) -> Result<Bytes, ExportError> {
        let cursor = self.writer.finish()?;
        Ok(Bytes::from(cursor.into_inner()))
    }

    fn unique_path(&self, path: &str) -> String {
        if !self.files.contains(path) {
            return path.to_string();
        }
        let (stem, extension) = match path.rsplit_once('.') {
            Some((stem, ext)) if !stem.ends_with('/') && !ext.contains('/') => {
                (stem, format!(".{ext}"))
            }
            _ => (path, String::new()),
        };
        (2..)
            .map(|n| format!("{stem}-{n}{extension}"))
            .find(|candidate| !self.files.contains(candidate))
            .unwrap_or_else(|| path.to_string())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `rapport_{subject}_{YYYY-MM}_{YYYY-MM}.zip`
#[must_use]
pub fn archive_filename(subject: &str, period: &AnalysisPeriod) -> String {
    format!(
        "rapport_{}_{}_{}.zip",
        sanitize_filename(subject),
        period.start(),
        period.end()
    )
}

/// Sanitize a name for use in archive and storage paths.
///
/// Accented Latin letters lose their accent; every other character outside
/// ASCII alphanumerics, dots, hyphens and underscores becomes `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            let c = fold_accent(c);
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "sans_titre".to_string()
    } else {
        sanitized
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'À' | 'Â' | 'Ä' | 'Á' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'î' | 'ï' | 'í' => 'i',
        'Î' | 'Ï' | 'Í' => 'I',
        'ô' | 'ö' | 'ó' => 'o',
        'Ô' | 'Ö' | 'Ó' => 'O',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'Ù' | 'Û' | 'Ü' | 'Ú' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        _ => c,
    }
}
