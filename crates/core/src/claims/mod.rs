//! Collection claims (dunning requests) on client invoices.

pub mod error;
pub mod service;
pub mod types;

pub use error::ClaimError;
pub use service::{ClaimService, normalize_recipients};
pub use types::{ClaimStatus, CollectionClaim, CreateClaimInput};
