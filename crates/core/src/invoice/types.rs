//! Client invoice domain types.

use std::fmt;

use billtrack_shared::types::{BatchId, InvoiceId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::collections::{CollectionFields, CollectionStatus};

/// Client invoice status.
///
/// Transitions are one-directional:
/// InvoiceDraft → PendingPartnerApproval → ReadyForSap → Issued → Delivered
/// → PlatformRequired → PlatformCompleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Created from a batch.
    InvoiceDraft,
    /// Waiting for the partner.
    PendingPartnerApproval,
    /// Approved, waiting for the accounting invoice number.
    ReadyForSap,
    /// Registered in accounting with a PDF.
    Issued,
    /// Sent to the client.
    Delivered,
    /// Client platform registration pending.
    PlatformRequired,
    /// All platform registrations done.
    PlatformCompleted,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvoiceDraft => "invoice_draft",
            Self::PendingPartnerApproval => "pending_partner_approval",
            Self::ReadyForSap => "ready_for_sap",
            Self::Issued => "issued",
            Self::Delivered => "delivered",
            Self::PlatformRequired => "platform_required",
            Self::PlatformCompleted => "platform_completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "invoice_draft" => Some(Self::InvoiceDraft),
            "pending_partner_approval" => Some(Self::PendingPartnerApproval),
            "ready_for_sap" => Some(Self::ReadyForSap),
            "issued" => Some(Self::Issued),
            "delivered" => Some(Self::Delivered),
            "platform_required" => Some(Self::PlatformRequired),
            "platform_completed" => Some(Self::PlatformCompleted),
            _ => None,
        }
    }

    /// Returns true once the invoice exists in accounting.
    #[must_use]
    pub fn is_issued(&self) -> bool {
        *self >= Self::Issued
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invoice sent to the client for a billing batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInvoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Source batch.
    pub batch_id: BatchId,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Invoice number in the accounting system.
    pub sap_invoice_number: Option<String>,
    /// Invoice date in the accounting system.
    pub sap_invoice_date: Option<NaiveDate>,
    /// Stored invoice PDF.
    pub pdf_file_path: Option<String>,
    /// Audit payload (see [`crate::sap::SapPayload`]).
    pub sap_payload: Option<serde_json::Value>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Amount due in the reporting currency.
    pub amount_due_eur: Option<Decimal>,
    /// Collections axis, independent of `status`.
    pub collection_status: CollectionStatus,
    /// Amount collected in the reporting currency.
    pub amount_paid_eur: Decimal,
    /// When the invoice was marked paid.
    pub paid_at: Option<DateTime<Utc>>,
    /// Operator who created the invoice.
    pub created_by: UserId,
    /// When the invoice was created.
    pub created_at: DateTime<Utc>,
    /// When the invoice last changed.
    pub updated_at: DateTime<Utc>,
}

impl ClientInvoice {
    /// Fields the collections snapshot is derived from.
    #[must_use]
    pub fn collection_fields(&self) -> CollectionFields<'_> {
        CollectionFields {
            collection_status: self.collection_status,
            amount_paid_eur: self.amount_paid_eur,
            amount_due_eur: self.amount_due_eur,
            sap_payload: self.sap_payload.as_ref(),
            due_date: self.due_date,
            sap_invoice_date: self.sap_invoice_date,
        }
    }
}

/// Accounting registration input.
#[derive(Debug, Clone)]
pub struct RegisterSapInvoiceInput {
    /// Invoice number in the accounting system.
    pub sap_invoice_number: String,
    /// Invoice date in the accounting system.
    pub sap_invoice_date: NaiveDate,
    /// Invoice PDF, required unless one is already stored.
    pub pdf: Option<crate::storage::UploadFile>,
}
