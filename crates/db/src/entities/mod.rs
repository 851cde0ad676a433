//! `SeaORM` entities, one module per table.

pub mod billing_batch_items;
pub mod billing_batches;
pub mod client_invoices;
pub mod collection_claims;
pub mod intake_items;
pub mod jobs;
pub mod platform_tasks;
pub mod sap_postings;
pub mod vendors;
