//! Intake domain types.

use std::fmt;

use billtrack_shared::types::{IntakeItemId, JobId, SapPostingId, UserId, VendorId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::compliance::{UttaiStatus, VendorCompliance};

/// Kind of document entering the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeType {
    /// Invoice from a vendor.
    VendorInvoice,
    /// Official fee paid to an organism (registry, court, office).
    OfficialFee,
}

impl IntakeType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VendorInvoice => "vendor_invoice",
            Self::OfficialFee => "official_fee",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vendor_invoice" => Some(Self::VendorInvoice),
            "official_fee" => Some(Self::OfficialFee),
            _ => None,
        }
    }

    /// Human-facing label used in exports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VendorInvoice => "Vendor invoice",
            Self::OfficialFee => "Official fee",
        }
    }
}

/// Intake item status.
///
/// Transitions:
/// - Draft → Submitted (submit)
/// - Submitted → Approved | Rejected (approve / reject)
/// - Approved → SentToAccounting (send to accounting)
/// - SentToAccounting → Posted (accounting posting registered)
/// - Posted → ReadyToBill (batched)
/// - ReadyToBill → Billed (client invoice issued)
/// - Billed → Archived (client invoice delivered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStatus {
    /// Created, editable.
    Draft,
    /// Awaiting approval.
    Submitted,
    /// Approved for accounting.
    Approved,
    /// Refused by the approver.
    Rejected,
    /// Handed over to accounting.
    SentToAccounting,
    /// Posted in the accounting system.
    Posted,
    /// Part of a billing batch.
    ReadyToBill,
    /// Included in an issued client invoice.
    Billed,
    /// Client invoice delivered.
    Archived,
}

impl IntakeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::SentToAccounting => "sent_to_accounting",
            Self::Posted => "posted",
            Self::ReadyToBill => "ready_to_bill",
            Self::Billed => "billed",
            Self::Archived => "archived",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "sent_to_accounting" => Some(Self::SentToAccounting),
            "posted" => Some(Self::Posted),
            "ready_to_bill" => Some(Self::ReadyToBill),
            "billed" => Some(Self::Billed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Human-facing label used in exports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::SentToAccounting => "Sent to accounting",
            Self::Posted => "Posted",
            Self::ReadyToBill => "Ready to bill",
            Self::Billed => "Billed",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A vendor invoice or official fee registered by an operator.
///
/// `exchange_rate_to_eur` and `amount_eur` are fixed at creation and never
/// recomputed in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeItem {
    /// Item ID.
    pub id: IntakeItemId,
    /// Document kind.
    pub item_type: IntakeType,
    /// Job the cost is charged to.
    pub job_id: Option<JobId>,
    /// Issuing vendor (vendor invoices).
    pub vendor_id: Option<VendorId>,
    /// Vendor invoice number or fee receipt number.
    pub invoice_number: Option<String>,
    /// Free-text concept.
    pub concept: Option<String>,
    /// Organism collecting an official fee.
    pub organism: Option<String>,
    /// Tariff code of an official fee.
    pub tariff: Option<String>,
    /// Original currency (ISO 4217).
    pub currency: String,
    /// Amount in the original currency.
    pub amount: Decimal,
    /// Rate applied at creation.
    pub exchange_rate_to_eur: Decimal,
    /// Amount in the reporting currency.
    pub amount_eur: Decimal,
    /// Lifecycle status.
    pub status: IntakeStatus,
    /// Stored supporting document.
    pub file_path: Option<String>,
    /// Job UTTAI flag when the item was created.
    pub uttai_status_snapshot: Option<UttaiStatus>,
    /// Vendor compliance when the item was created.
    pub vendor_compliance_snapshot: Option<VendorCompliance>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// Operator who registered the item.
    pub created_by: UserId,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item last changed.
    pub updated_at: DateTime<Utc>,
}

impl IntakeItem {
    /// Returns true for official fees that carry a stored document.
    #[must_use]
    pub fn is_fee_with_document(&self) -> bool {
        self.item_type == IntakeType::OfficialFee && self.file_path.is_some()
    }
}

/// Operator input for a new intake item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIntakeInput {
    /// Document kind.
    pub item_type: IntakeType,
    /// Job the cost is charged to.
    pub job_id: Option<JobId>,
    /// Issuing vendor.
    pub vendor_id: Option<VendorId>,
    /// Vendor invoice number or fee receipt number.
    pub invoice_number: Option<String>,
    /// Free-text concept.
    pub concept: Option<String>,
    /// Organism collecting an official fee.
    pub organism: Option<String>,
    /// Tariff code of an official fee.
    pub tariff: Option<String>,
    /// Original currency.
    pub currency: String,
    /// Amount in the original currency.
    pub amount: Decimal,
    /// Declared rate to the reporting currency.
    pub exchange_rate_to_eur: Option<Decimal>,
}

impl CreateIntakeInput {
    /// Invoice number with surrounding whitespace removed; empty counts as absent.
    #[must_use]
    pub fn normalized_invoice_number(&self) -> Option<String> {
        self.invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Append-only record of an accounting posting for one intake item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SapPosting {
    /// Posting ID.
    pub id: SapPostingId,
    /// Posted intake item.
    pub intake_item_id: IntakeItemId,
    /// Document reference in the accounting system.
    pub sap_reference: String,
    /// Operator who registered the posting.
    pub posted_by: UserId,
    /// When the posting was registered.
    pub posted_at: DateTime<Utc>,
}
