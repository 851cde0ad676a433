//! Invoice error types.

use billtrack_shared::AppError;
use billtrack_shared::types::{BatchId, InvoiceId};
use thiserror::Error;

use super::types::InvoiceStatus;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Errors raised by the invoice lifecycle.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoice does not exist.
    #[error("Invoice {0} not found")]
    NotFound(InvoiceId),

    /// Source batch does not exist.
    #[error("Batch {0} not found")]
    BatchNotFound(BatchId),

    /// Every item of the batch is discarded.
    #[error("Batch {0} has no billable items")]
    BatchEmpty(BatchId),

    /// Batch already produced an invoice.
    #[error("Batch {0} is already invoiced")]
    BatchAlreadyInvoiced(BatchId),

    /// Status change not allowed from the current status.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: InvoiceStatus,
        /// The attempted target status.
        to: InvoiceStatus,
    },

    /// No PDF stored or supplied.
    #[error("Invoice {0} has no PDF")]
    MissingPdf(InvoiceId),

    /// Accounting invoice number missing.
    #[error("Accounting invoice number is required")]
    SapNumberRequired,

    /// Document storage failure.
    #[error("Document storage failed: {0}")]
    Upload(#[from] StorageError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InvoiceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::BatchNotFound(_) => 404,
            Self::BatchEmpty(_)
            | Self::BatchAlreadyInvoiced(_)
            | Self::InvalidTransition { .. }
            | Self::MissingPdf(_) => 422,
            Self::SapNumberRequired => 400,
            Self::Upload(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::BatchNotFound(_) => "BATCH_NOT_FOUND",
            Self::BatchEmpty(_) => "BATCH_EMPTY",
            Self::BatchAlreadyInvoiced(_) => "BATCH_ALREADY_INVOICED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::MissingPdf(_) => "MISSING_PDF",
            Self::SapNumberRequired => "SAP_NUMBER_REQUIRED",
            Self::Upload(_) => "UPLOAD_ERROR",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Upload(inner) => inner.into(),
            InvoiceError::Store(inner) => inner.into(),
            InvoiceError::NotFound(_) | InvoiceError::BatchNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            InvoiceError::SapNumberRequired => Self::Validation(err.to_string()),
            InvoiceError::BatchEmpty(_)
            | InvoiceError::BatchAlreadyInvoiced(_)
            | InvoiceError::InvalidTransition { .. }
            | InvoiceError::MissingPdf(_) => Self::BusinessRule(err.to_string()),
        }
    }
}
