//! Billing batch domain types.

use std::fmt;

use billtrack_shared::types::{BatchId, BatchItemId, IntakeItemId, JobId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billing batch status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Decisions still open.
    Draft,
    /// A client invoice was created from the batch.
    Invoiced,
}

impl BatchStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Invoiced => "invoiced",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "invoiced" => Some(Self::Invoiced),
            _ => None,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-item disposition inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Bill to the client.
    Emit,
    /// Move to another billing vehicle.
    Transfer,
    /// Exclude from billing and every downstream total.
    Discard,
}

impl Decision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emit => "emit",
            Self::Transfer => "transfer",
            Self::Discard => "discard",
        }
    }

    /// Parses a decision from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "emit" => Some(Self::Emit),
            "transfer" => Some(Self::Transfer),
            "discard" => Some(Self::Discard),
            _ => None,
        }
    }
}

/// Group of intake items billed together for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBatch {
    /// Batch ID.
    pub id: BatchId,
    /// Job all items belong to.
    pub job_id: JobId,
    /// Batch status.
    pub status: BatchStatus,
    /// Whether the client is a UTTAI obliged subject.
    pub uttai_subject_obliged: bool,
    /// Operator who created the batch.
    pub created_by: UserId,
    /// When the batch was created.
    pub created_at: DateTime<Utc>,
}

/// Membership of one intake item in a batch.
///
/// Membership is fixed at batch creation; only `attach_fee` and `decision`
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBatchItem {
    /// Batch item ID.
    pub id: BatchItemId,
    /// Owning batch.
    pub batch_id: BatchId,
    /// Intake item.
    pub intake_item_id: IntakeItemId,
    /// Attach the fee document to the client invoice.
    pub attach_fee: bool,
    /// Disposition; `None` until decided.
    pub decision: Option<Decision>,
}

impl BillingBatchItem {
    /// Returns true if the item is excluded from totals and cascades.
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.decision == Some(Decision::Discard)
    }
}

/// A batch with its items.
#[derive(Debug, Clone, Serialize)]
pub struct BatchWithItems {
    /// The batch.
    pub batch: BillingBatch,
    /// Its items, in creation order.
    pub items: Vec<BillingBatchItem>,
}
