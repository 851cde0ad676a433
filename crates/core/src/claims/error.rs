//! Collection claim error types.

use billtrack_shared::AppError;
use billtrack_shared::types::{ClaimId, InvoiceId};
use thiserror::Error;

use super::types::ClaimStatus;
use crate::store::StoreError;

/// Errors raised by the claim service.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Claimed invoice does not exist.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    /// Claim does not exist.
    #[error("Claim {0} not found")]
    NotFound(ClaimId),

    /// No TO recipient left after normalization.
    #[error("At least one recipient is required")]
    NoRecipients,

    /// Address failed the email check.
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// The invoice is already collected.
    #[error("Invoice {0} is already paid")]
    InvoicePaid(InvoiceId),

    /// Rejection without a reason.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Claim status change not allowed.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ClaimStatus,
        /// The attempted target status.
        to: ClaimStatus,
    },

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClaimError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvoiceNotFound(_) | Self::NotFound(_) => 404,
            Self::NoRecipients | Self::InvalidRecipient(_) | Self::RejectionReasonRequired => 400,
            Self::InvoicePaid(_) | Self::InvalidTransition { .. } => 422,
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::NotFound(_) => "CLAIM_NOT_FOUND",
            Self::NoRecipients => "NO_RECIPIENTS",
            Self::InvalidRecipient(_) => "INVALID_RECIPIENT",
            Self::InvoicePaid(_) => "INVOICE_PAID",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<ClaimError> for AppError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::Store(inner) => inner.into(),
            ClaimError::InvoiceNotFound(_) | ClaimError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ClaimError::NoRecipients
            | ClaimError::InvalidRecipient(_)
            | ClaimError::RejectionReasonRequired => Self::Validation(err.to_string()),
            ClaimError::InvoicePaid(_) | ClaimError::InvalidTransition { .. } => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
