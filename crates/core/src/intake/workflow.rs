//! Intake status transitions.
//!
//! Operator-driven transitions only. `ready_to_bill`, `billed` and
//! `archived` are reached through batch and invoice cascades, never here.

use super::error::IntakeError;
use super::types::IntakeStatus;

/// Stateless validator for operator-driven intake transitions.
pub struct IntakeWorkflow;

impl IntakeWorkflow {
    /// Draft → Submitted.
    pub fn submit(current: IntakeStatus) -> Result<IntakeStatus, IntakeError> {
        Self::step(current, IntakeStatus::Draft, IntakeStatus::Submitted)
    }

    /// Submitted → Approved.
    pub fn approve(current: IntakeStatus) -> Result<IntakeStatus, IntakeError> {
        Self::step(current, IntakeStatus::Submitted, IntakeStatus::Approved)
    }

    /// Submitted → Rejected. Returns the trimmed reason.
    ///
    /// Rejected is terminal.
    pub fn reject(current: IntakeStatus, reason: &str) -> Result<(IntakeStatus, String), IntakeError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(IntakeError::RejectionReasonRequired);
        }
        let next = Self::step(current, IntakeStatus::Submitted, IntakeStatus::Rejected)?;
        Ok((next, reason.to_string()))
    }

    /// Approved → SentToAccounting.
    pub fn send_to_accounting(current: IntakeStatus) -> Result<IntakeStatus, IntakeError> {
        Self::step(current, IntakeStatus::Approved, IntakeStatus::SentToAccounting)
    }

    /// SentToAccounting → Posted.
    pub fn post(current: IntakeStatus) -> Result<IntakeStatus, IntakeError> {
        Self::step(current, IntakeStatus::SentToAccounting, IntakeStatus::Posted)
    }

    fn step(
        current: IntakeStatus,
        expected: IntakeStatus,
        next: IntakeStatus,
    ) -> Result<IntakeStatus, IntakeError> {
        if current == expected {
            Ok(next)
        } else {
            Err(IntakeError::InvalidTransition {
                from: current,
                to: next,
            })
        }
    }
}
