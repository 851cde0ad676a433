//! Platform task error types.

use billtrack_shared::AppError;
use billtrack_shared::types::{InvoiceId, PlatformTaskId};
use thiserror::Error;

use super::types::PlatformTaskStatus;
use crate::invoice::InvoiceError;
use crate::store::StoreError;

/// Errors raised by the platform task service.
#[derive(Debug, Error)]
pub enum PlatformTaskError {
    /// Invoice does not exist.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    /// Task does not exist.
    #[error("Platform task {0} not found")]
    NotFound(PlatformTaskId),

    /// No platform names supplied.
    #[error("At least one platform is required")]
    NoPlatforms,

    /// Block without a reason.
    #[error("Block reason is required")]
    BlockReasonRequired,

    /// Task status change not allowed.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: PlatformTaskStatus,
        /// The attempted target status.
        to: PlatformTaskStatus,
    },

    /// The invoice is not in a status that accepts platform tasks.
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlatformTaskError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvoiceNotFound(_) | Self::NotFound(_) => 404,
            Self::NoPlatforms | Self::BlockReasonRequired => 400,
            Self::InvalidTransition { .. } => 422,
            Self::Invoice(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::NotFound(_) => "PLATFORM_TASK_NOT_FOUND",
            Self::NoPlatforms => "NO_PLATFORMS",
            Self::BlockReasonRequired => "BLOCK_REASON_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Invoice(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<PlatformTaskError> for AppError {
    fn from(err: PlatformTaskError) -> Self {
        match err {
            PlatformTaskError::Invoice(inner) => inner.into(),
            PlatformTaskError::Store(inner) => inner.into(),
            PlatformTaskError::InvoiceNotFound(_) | PlatformTaskError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            PlatformTaskError::NoPlatforms | PlatformTaskError::BlockReasonRequired => {
                Self::Validation(err.to_string())
            }
            PlatformTaskError::InvalidTransition { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
