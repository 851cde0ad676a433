//! Storage error types.

use billtrack_shared::AppError;
use thiserror::Error;

/// Document storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Document exceeds the upload limit.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// Document type is not accepted.
    #[error("MIME type '{mime_type}' is not allowed")]
    InvalidMimeType {
        /// Rejected MIME type.
        mime_type: String,
    },

    /// Stored document is missing.
    #[error("file not found: {key}")]
    NotFound {
        /// Provider message naming the key.
        key: String,
    },

    /// Backend cannot sign download links.
    #[error("presign operation not supported by storage provider")]
    PresignNotSupported,

    /// Storage settings are incomplete or invalid.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Backend call failed.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::FileTooLarge { .. } => 413,
            Self::InvalidMimeType { .. } => 415,
            Self::NotFound { .. } => 404,
            Self::PresignNotSupported | Self::Configuration(_) => 500,
            Self::Operation(_) => 502,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::InvalidMimeType { .. } => "INVALID_MIME_TYPE",
            Self::NotFound { .. } => "FILE_NOT_FOUND",
            Self::PresignNotSupported => "PRESIGN_NOT_SUPPORTED",
            Self::Configuration(_) => "STORAGE_CONFIGURATION",
            Self::Operation(_) => "UPLOAD_ERROR",
        }
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            opendal::ErrorKind::Unsupported => Self::PresignNotSupported,
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileTooLarge { .. } | StorageError::InvalidMimeType { .. } => {
                Self::Validation(err.to_string())
            }
            StorageError::NotFound { .. } => Self::NotFound(err.to_string()),
            StorageError::Configuration(_) => Self::Internal(err.to_string()),
            StorageError::PresignNotSupported | StorageError::Operation(_) => {
                Self::ExternalService(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(opendal::ErrorKind::NotFound, "FILE_NOT_FOUND", 404)]
    #[case(opendal::ErrorKind::Unsupported, "PRESIGN_NOT_SUPPORTED", 500)]
    #[case(opendal::ErrorKind::Unexpected, "UPLOAD_ERROR", 502)]
    fn test_backend_errors_map_to_codes(
        #[case] kind: opendal::ErrorKind,
        #[case] code: &str,
        #[case] status: u16,
    ) {
        let err = StorageError::from(opendal::Error::new(kind, "intake/u/1.pdf"));
        assert_eq!(err.error_code(), code);
        assert_eq!(err.status_code(), status);
    }
}
