//! OpenDAL-backed document store.

use std::future::Future;
use std::time::Duration;

use billtrack_shared::types::{InvoiceId, UserId};
use chrono::{DateTime, Utc};
use opendal::{ErrorKind, Operator, services};
use tracing::{debug, info};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// A file handed in by an operator for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original filename; only its extension is kept in the stored path.
    pub filename: String,
    /// MIME type declared by the client.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Creates an upload from its parts.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }
}

/// Document storage boundary used by the workflow services.
pub trait DocumentStore: Send + Sync {
    /// Stores `file` at `path` and returns the stored path.
    fn upload(
        &self,
        path: &str,
        file: &UploadFile,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Returns a time-limited download URL for `path`.
    fn signed_url(
        &self,
        path: &str,
        expiry: Duration,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// Storage service for supporting documents and invoice PDFs.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// In-memory store with default limits.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::from_config(StorageConfig::new(StorageProvider::Memory))
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => Operator::new(
                services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region),
            )
            .map(|builder| builder.finish()),
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => Operator::new(
                services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container),
            )
            .map(|builder| builder.finish()),
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root)).map(|builder| builder.finish())
            }
            StorageProvider::Memory => {
                Operator::new(services::Memory::default()).map(|builder| builder.finish())
            }
        };

        operator.map_err(|e| StorageError::configuration(e.to_string()))
    }

    /// Validate an upload against the size and MIME type limits.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, path: &str) -> bool {
        match self.operator.stat(path).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Configured signed URL lifetime.
    #[must_use]
    pub fn download_ttl(&self) -> Duration {
        Duration::from_secs(self.config.presign_download_ttl_secs)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

impl DocumentStore for StorageService {
    async fn upload(&self, path: &str, file: &UploadFile) -> Result<String, StorageError> {
        self.validate_upload(&file.content_type, file.size())?;

        self.operator
            .write(path, file.bytes.clone())
            .await
            .map_err(StorageError::from)?;

        info!(path, size = file.size(), provider = self.provider_name(), "Document stored");
        Ok(path.to_string())
    }

    async fn signed_url(&self, path: &str, expiry: Duration) -> Result<String, StorageError> {
        debug!(path, ttl_secs = expiry.as_secs(), "Presigning download");
        let presigned = self
            .operator
            .presign_read(path, expiry)
            .await
            .map_err(StorageError::from)?;
        Ok(presigned.uri().to_string())
    }
}

/// Path for an intake supporting document: `intake/{actor}/{timestamp}.{ext}`.
#[must_use]
pub fn intake_path(actor: UserId, at: DateTime<Utc>, filename: &str) -> String {
    format!(
        "intake/{actor}/{}.{}",
        at.timestamp_millis(),
        file_extension(filename)
    )
}

/// Path for a client invoice PDF: `invoices/{invoice_id}/{uuid}.{ext}`.
#[must_use]
pub fn invoice_pdf_path(invoice_id: InvoiceId, filename: &str) -> String {
    format!(
        "invoices/{invoice_id}/{}.{}",
        Uuid::new_v4(),
        file_extension(filename)
    )
}

/// Lowercased extension with everything but ASCII alphanumerics removed.
fn file_extension(filename: &str) -> String {
    let ext: String = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if ext.is_empty() { "bin".to_string() } else { ext }
}
