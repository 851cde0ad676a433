//! Client platform registration of delivered invoices.

pub mod error;
pub mod service;
pub mod types;

pub use error::PlatformTaskError;
pub use service::PlatformTaskService;
pub use types::{PlatformTask, PlatformTaskStatus};
