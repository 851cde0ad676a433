//! Client invoice status transitions.
//!
//! Every transition moves exactly one step forward. There is no way back
//! to an earlier status.

use super::error::InvoiceError;
use super::types::InvoiceStatus;

/// Stateless validator for invoice transitions.
pub struct InvoiceLifecycle;

impl InvoiceLifecycle {
    /// InvoiceDraft → PendingPartnerApproval.
    pub fn request_partner_approval(current: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
        Self::step(
            current,
            InvoiceStatus::InvoiceDraft,
            InvoiceStatus::PendingPartnerApproval,
        )
    }

    /// PendingPartnerApproval → ReadyForSap.
    pub fn approve_as_partner(current: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
        Self::step(
            current,
            InvoiceStatus::PendingPartnerApproval,
            InvoiceStatus::ReadyForSap,
        )
    }

    /// ReadyForSap → Issued.
    pub fn issue(current: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
        Self::step(current, InvoiceStatus::ReadyForSap, InvoiceStatus::Issued)
    }

    /// Issued → Delivered.
    pub fn deliver(current: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
        Self::step(current, InvoiceStatus::Issued, InvoiceStatus::Delivered)
    }

    /// Delivered → PlatformRequired.
    pub fn require_platform(current: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
        Self::step(
            current,
            InvoiceStatus::Delivered,
            InvoiceStatus::PlatformRequired,
        )
    }

    /// PlatformRequired → PlatformCompleted.
    pub fn complete_platform(current: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
        Self::step(
            current,
            InvoiceStatus::PlatformRequired,
            InvoiceStatus::PlatformCompleted,
        )
    }

    fn step(
        current: InvoiceStatus,
        expected: InvoiceStatus,
        next: InvoiceStatus,
    ) -> Result<InvoiceStatus, InvoiceError> {
        if current == expected {
            Ok(next)
        } else {
            Err(InvoiceError::InvalidTransition {
                from: current,
                to: next,
            })
        }
    }
}
