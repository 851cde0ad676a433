//! Core billing workflow for Billtrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the repository traits in [`store`]; document
//! storage through [`storage::DocumentStore`].
//!
//! # Modules
//!
//! - `currency` - Rate resolution and reporting-currency amounts
//! - `compliance` - Job and vendor gating flags
//! - `intake` - Vendor invoices and official fees, with their guards
//! - `batch` - Billing batch aggregation
//! - `invoice` - Client invoice lifecycle and status cascades
//! - `sap` - Accounting audit payload
//! - `collections` - Due dates, outstanding amounts and buckets
//! - `platform` - Client platform registration tasks
//! - `claims` - Dunning claims
//! - `export` - Report rows, deduplication and deep links

pub mod batch;
pub mod claims;
pub mod collections;
pub mod compliance;
pub mod currency;
pub mod export;
pub mod intake;
pub mod invoice;
pub mod outcome;
pub mod platform;
pub mod sap;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_support;

pub use batch::{BatchAggregator, BatchError};
pub use claims::{ClaimError, ClaimService};
pub use collections::{CollectionBucket, CollectionSnapshot, PaymentTerms};
pub use currency::{CurrencyError, CurrencyResolver};
pub use intake::{IntakeError, IntakeLedger};
pub use invoice::{InvoiceError, InvoiceService};
pub use outcome::Outcome;
pub use platform::{PlatformTaskError, PlatformTaskService};
pub use storage::{DocumentStore, StorageService};
pub use store::{MemoryStore, StoreError};
