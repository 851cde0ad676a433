//! Billing batches: intake items of one job grouped for client invoicing.
//!
//! Membership is fixed when the batch is created. Per-item decisions and
//! the attach-fee flag stay editable until the batch is invoiced.

pub mod error;
pub mod service;
pub mod types;

pub use error::BatchError;
pub use service::BatchAggregator;
pub use types::{BatchStatus, BatchWithItems, BillingBatch, BillingBatchItem, Decision};
