//! Intake error types.

use billtrack_shared::AppError;
use billtrack_shared::types::{IntakeItemId, JobId, VendorId};
use thiserror::Error;

use super::types::IntakeStatus;
use crate::currency::CurrencyError;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Errors raised by the intake ledger.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The job's UTTAI flag is `blocked`.
    #[error("Job {job_id} is blocked by UTTAI compliance")]
    JobBlocked {
        /// Blocked job.
        job_id: JobId,
    },

    /// The vendor is non-compliant.
    #[error("Vendor {vendor_id} is not compliant")]
    VendorNonCompliant {
        /// Non-compliant vendor.
        vendor_id: VendorId,
    },

    /// An item with the same vendor, invoice number and amount exists.
    #[error("Invoice {invoice_number} from this vendor is already registered as {existing_id}")]
    DuplicateInvoice {
        /// Invoice number supplied.
        invoice_number: String,
        /// The existing item.
        existing_id: IntakeItemId,
    },

    /// Referenced job does not exist.
    #[error("Job {0} not found")]
    JobNotFound(JobId),

    /// Referenced vendor does not exist.
    #[error("Vendor {0} not found")]
    VendorNotFound(VendorId),

    /// Intake item does not exist.
    #[error("Intake item {0} not found")]
    NotFound(IntakeItemId),

    /// Status change not allowed from the current status.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: IntakeStatus,
        /// The attempted target status.
        to: IntakeStatus,
    },

    /// Rejection without a reason.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Posting without an accounting reference.
    #[error("Accounting reference is required")]
    SapReferenceRequired,

    /// Amount could not be resolved into the reporting currency.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Supporting document upload failed.
    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntakeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::JobBlocked { .. }
            | Self::VendorNonCompliant { .. }
            | Self::InvalidTransition { .. } => 422,
            Self::DuplicateInvoice { .. } => 409,
            Self::JobNotFound(_) | Self::VendorNotFound(_) | Self::NotFound(_) => 404,
            Self::RejectionReasonRequired | Self::SapReferenceRequired => 400,
            Self::Currency(err) => err.status_code(),
            Self::Upload(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::JobBlocked { .. } => "JOB_BLOCKED",
            Self::VendorNonCompliant { .. } => "VENDOR_NON_COMPLIANT",
            Self::DuplicateInvoice { .. } => "DUPLICATE_INVOICE",
            Self::JobNotFound(_) => "JOB_NOT_FOUND",
            Self::VendorNotFound(_) => "VENDOR_NOT_FOUND",
            Self::NotFound(_) => "INTAKE_ITEM_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::SapReferenceRequired => "SAP_REFERENCE_REQUIRED",
            Self::Currency(err) => err.error_code(),
            Self::Upload(_) => "UPLOAD_ERROR",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Currency(inner) => inner.into(),
            IntakeError::Upload(inner) => inner.into(),
            IntakeError::Store(inner) => inner.into(),
            IntakeError::DuplicateInvoice { .. } => Self::Conflict(err.to_string()),
            IntakeError::JobNotFound(_)
            | IntakeError::VendorNotFound(_)
            | IntakeError::NotFound(_) => Self::NotFound(err.to_string()),
            IntakeError::RejectionReasonRequired | IntakeError::SapReferenceRequired => {
                Self::Validation(err.to_string())
            }
            IntakeError::JobBlocked { .. }
            | IntakeError::VendorNonCompliant { .. }
            | IntakeError::InvalidTransition { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
