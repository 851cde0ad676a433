//! Storage configuration types.

use std::path::PathBuf;

use billtrack_shared::StorageSettings;
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory (tests)
    Memory,
}

impl StorageProvider {
    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local_fs",
            Self::Memory => "memory",
        }
    }

    /// Builds the provider named in `settings`, checking that the fields it
    /// needs are present.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        fn required(value: Option<&String>, field: &str) -> Result<String, StorageError> {
            value
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .ok_or_else(|| StorageError::configuration(format!("storage.{field} is required")))
        }

        match settings.provider.trim().to_lowercase().as_str() {
            "s3" => Ok(Self::S3 {
                endpoint: required(settings.endpoint.as_ref(), "endpoint")?,
                bucket: required(settings.bucket.as_ref(), "bucket")?,
                access_key_id: required(settings.access_key_id.as_ref(), "access_key_id")?,
                secret_access_key: required(
                    settings.secret_access_key.as_ref(),
                    "secret_access_key",
                )?,
                region: settings
                    .region
                    .clone()
                    .unwrap_or_else(|| "auto".to_string()),
            }),
            "azure_blob" => Ok(Self::AzureBlob {
                account: required(settings.account.as_ref(), "account")?,
                access_key: required(settings.access_key.as_ref(), "access_key")?,
                container: required(settings.bucket.as_ref(), "bucket")?,
            }),
            "local_fs" => Ok(Self::LocalFs {
                root: PathBuf::from(required(settings.root.as_ref(), "root")?),
            }),
            "memory" => Ok(Self::Memory),
            other => Err(StorageError::configuration(format!(
                "unknown storage provider '{other}'"
            ))),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Signed download URL TTL in seconds.
    pub presign_download_ttl_secs: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    /// Default download TTL: 1 hour.
    pub const DEFAULT_DOWNLOAD_TTL: u64 = 3600;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            presign_download_ttl_secs: Self::DEFAULT_DOWNLOAD_TTL,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Builds the config from the `storage` section of the app config.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        Ok(Self::new(StorageProvider::from_settings(settings)?)
            .with_max_file_size(settings.max_file_size)
            .with_download_ttl(settings.presign_download_ttl_secs))
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set signed download URL TTL.
    #[must_use]
    pub fn with_download_ttl(mut self, secs: u64) -> Self {
        self.presign_download_ttl_secs = secs;
        self
    }

    /// Supporting documents accepted for intake items and invoice PDFs.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        [
            "application/pdf",
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "application/vnd.ms-excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "image/png",
            "image/jpeg",
            "image/tiff",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim().to_lowercase();
        self.allowed_mime_types.iter().any(|t| *t == mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> StorageSettings {
        StorageSettings {
            provider: provider.to_string(),
            ..StorageSettings::default()
        }
    }

    #[test]
    fn test_local_fs_from_default_settings() {
        let provider = StorageProvider::from_settings(&StorageSettings::default()).unwrap();
        assert_eq!(provider.name(), "local_fs");
    }

    #[test]
    fn test_memory_provider() {
        let provider = StorageProvider::from_settings(&settings("Memory")).unwrap();
        assert_eq!(provider.name(), "memory");
    }

    #[test]
    fn test_s3_requires_bucket() {
        let mut s = settings("s3");
        s.endpoint = Some("https://r2.example.com".to_string());
        s.access_key_id = Some("key".to_string());
        s.secret_access_key = Some("secret".to_string());
        let err = StorageProvider::from_settings(&s).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(msg) if msg.contains("bucket")));

        s.bucket = Some("documents".to_string());
        let provider = StorageProvider::from_settings(&s).unwrap();
        assert!(matches!(provider, StorageProvider::S3 { ref region, .. } if region == "auto"));
    }

    #[test]
    fn test_unknown_provider() {
        assert!(StorageProvider::from_settings(&settings("ftp")).is_err());
    }

    #[test]
    fn test_config_from_settings_carries_limits() {
        let mut s = settings("memory");
        s.max_file_size = 2048;
        s.presign_download_ttl_secs = 60;
        let config = StorageConfig::from_settings(&s).unwrap();
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.presign_download_ttl_secs, 60);
    }

    #[test]
    fn test_mime_type_validation() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert!(config.is_mime_type_allowed("application/pdf"));
        assert!(config.is_mime_type_allowed("Image/PNG"));
        assert!(!config.is_mime_type_allowed("application/x-executable"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }
}
