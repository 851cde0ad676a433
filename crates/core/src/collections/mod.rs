//! Collections tracking for issued client invoices.
//!
//! The snapshot is derived on every read from the persisted invoice fields
//! and is never stored or cached.

pub mod snapshot;

#[cfg(test)]
mod props;

pub use snapshot::{
    CollectionBucket, CollectionFields, CollectionSnapshot, CollectionStatus, PaymentTerms,
};
