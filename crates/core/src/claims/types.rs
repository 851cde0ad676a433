//! Collection claim types.

use std::fmt;

use billtrack_shared::types::{ClaimId, InvoiceId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection claim status.
///
/// PendingApproval → Approved → Sent, or PendingApproval → Rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Drafted, waiting for approval.
    PendingApproval,
    /// Approved for sending.
    Approved,
    /// Refused.
    Rejected,
    /// Sent to the client.
    Sent,
}

impl ClaimStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Sent => "sent",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending_approval" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "sent" => Some(Self::Sent),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dunning communication request for one client invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionClaim {
    /// Claim ID.
    pub id: ClaimId,
    /// Claimed invoice.
    pub invoice_id: InvoiceId,
    /// Primary recipients; never empty.
    pub to_recipients: Vec<String>,
    /// Copied recipients.
    pub cc_recipients: Vec<String>,
    /// Internal owners of the claim.
    pub responsible_recipients: Vec<String>,
    /// Message body.
    pub body: String,
    /// Claim status.
    pub status: ClaimStatus,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// Operator who drafted the claim.
    pub created_by: UserId,
    /// Approver or rejecter.
    pub reviewed_by: Option<UserId>,
    /// When the claim was sent.
    pub sent_at: Option<DateTime<Utc>>,
    /// When the claim was drafted.
    pub created_at: DateTime<Utc>,
    /// When the claim last changed.
    pub updated_at: DateTime<Utc>,
}

/// Input for a new claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateClaimInput {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Copied recipients.
    pub cc: Vec<String>,
    /// Internal owners.
    pub responsible: Vec<String>,
    /// Message body.
    pub body: String,
}
