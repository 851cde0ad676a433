//! Batch error types.

use billtrack_shared::AppError;
use billtrack_shared::types::{BatchId, BatchItemId, IntakeItemId, JobId};
use thiserror::Error;

use crate::intake::IntakeStatus;
use crate::store::StoreError;

/// Errors raised by the batch aggregator.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The job's UTTAI flag is `blocked`.
    #[error("Job {job_id} is blocked by UTTAI compliance")]
    JobBlocked {
        /// Blocked job.
        job_id: JobId,
    },

    /// Referenced job does not exist.
    #[error("Job {0} not found")]
    JobNotFound(JobId),

    /// Batch requested without intake items.
    #[error("A batch needs at least one intake item")]
    NoItems,

    /// Referenced intake item does not exist.
    #[error("Intake item {0} not found")]
    IntakeItemNotFound(IntakeItemId),

    /// Intake item is recorded against another job.
    #[error("Intake item {item} does not belong to job {job_id}")]
    ItemJobMismatch {
        /// Offending intake item.
        item: IntakeItemId,
        /// Job the batch was requested for.
        job_id: JobId,
    },

    /// Intake item has not reached `posted`.
    #[error("Intake item {item} is {status}, only posted items can be batched")]
    InvalidItemStatus {
        /// Offending intake item.
        item: IntakeItemId,
        /// Its current status.
        status: IntakeStatus,
    },

    /// Batch does not exist.
    #[error("Batch {0} not found")]
    NotFound(BatchId),

    /// Batch item does not exist.
    #[error("Batch item {0} not found")]
    ItemNotFound(BatchItemId),

    /// Batch already produced a client invoice.
    #[error("Batch {0} is already invoiced")]
    AlreadyInvoiced(BatchId),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BatchError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::JobBlocked { .. }
            | Self::AlreadyInvoiced(_)
            | Self::ItemJobMismatch { .. }
            | Self::InvalidItemStatus { .. } => 422,
            Self::JobNotFound(_)
            | Self::IntakeItemNotFound(_)
            | Self::NotFound(_)
            | Self::ItemNotFound(_) => 404,
            Self::NoItems => 400,
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::JobBlocked { .. } => "JOB_BLOCKED",
            Self::JobNotFound(_) => "JOB_NOT_FOUND",
            Self::NoItems => "NO_ITEMS",
            Self::IntakeItemNotFound(_) => "INTAKE_ITEM_NOT_FOUND",
            Self::ItemJobMismatch { .. } => "ITEM_JOB_MISMATCH",
            Self::InvalidItemStatus { .. } => "INVALID_ITEM_STATUS",
            Self::NotFound(_) => "BATCH_NOT_FOUND",
            Self::ItemNotFound(_) => "BATCH_ITEM_NOT_FOUND",
            Self::AlreadyInvoiced(_) => "BATCH_ALREADY_INVOICED",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Store(inner) => inner.into(),
            BatchError::JobBlocked { .. }
            | BatchError::AlreadyInvoiced(_)
            | BatchError::ItemJobMismatch { .. }
            | BatchError::InvalidItemStatus { .. } => Self::BusinessRule(err.to_string()),
            BatchError::NoItems => Self::Validation(err.to_string()),
            BatchError::JobNotFound(_)
            | BatchError::IntakeItemNotFound(_)
            | BatchError::NotFound(_)
            | BatchError::ItemNotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}
