//! Client invoices and the lifecycle propagation back onto intake items.

pub mod error;
pub mod lifecycle;
pub mod service;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::InvoiceError;
pub use lifecycle::InvoiceLifecycle;
pub use service::InvoiceService;
pub use types::{ClientInvoice, InvoiceStatus, RegisterSapInvoiceInput};
