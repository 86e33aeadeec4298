//! Archive delivery through Apache OpenDAL.

use opendal::{ErrorKind, Operator, services};
use propledger_shared::config::StorageProvider;
use tracing::info;

use crate::archive::ExportArchive;
use crate::error::ExportError;

/// Writes finished archives to the configured destination.
#[derive(Debug, Clone)]
pub struct ArchiveSink {
    operator: Operator,
    provider: &'static str,
}

impl ArchiveSink {
    /// Creates a sink for the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: &StorageProvider) -> Result<Self, ExportError> {
        Ok(Self {
            operator: create_operator(provider)?,
            provider: provider.name(),
        })
    }

    /// Writes the archive under its filename and returns the storage key.
    pub async fn deliver(&self, archive: &ExportArchive) -> Result<String, ExportError> {
        let key = archive.filename.clone();
        self.operator.write(&key, archive.bytes.clone()).await?;
        info!(
            provider = self.provider,
            key = %key,
            size = archive.bytes.len(),
            "Archive delivered"
        );
        Ok(key)
    }

    /// Reads a delivered archive back.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, ExportError> {
        match self.operator.read(key).await {
            Ok(buffer) => Ok(buffer.to_vec()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ExportError::storage(format!("archive not found: {key}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if an archive exists.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }
}

fn create_operator(provider: &StorageProvider) -> Result<Operator, ExportError> {
    let operator = match provider {
        StorageProvider::S3 {
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        } => {
            let builder = services::S3::default()
                .endpoint(endpoint)
                .bucket(bucket)
                .access_key_id(access_key_id)
                .secret_access_key(secret_access_key)
                .region(region);
            Operator::new(builder)
                .map_err(|e| ExportError::configuration(e.to_string()))?
                .finish()
        }
        StorageProvider::LocalFs { root } => {
            let builder = services::Fs::default().root(
                root.to_str()
                    .ok_or_else(|| ExportError::configuration("invalid path"))?,
            );
            Operator::new(builder)
                .map_err(|e| ExportError::configuration(e.to_string()))?
                .finish()
        }
    };
    Ok(operator)
}
