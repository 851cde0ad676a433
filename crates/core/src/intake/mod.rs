//! Intake of vendor invoices and official fees.
//!
//! Creation runs the compliance and duplicate guards before anything is
//! uploaded or written, and fixes the reporting-currency amount once.

pub mod error;
pub mod ledger;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod workflow_props;

pub use error::IntakeError;
pub use ledger::IntakeLedger;
pub use types::{CreateIntakeInput, IntakeItem, IntakeStatus, IntakeType, SapPosting};
pub use workflow::IntakeWorkflow;
