//! Document storage for intake supporting files and client invoice PDFs,
//! backed by Apache OpenDAL.
//!
//! Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - Memory (tests)
//!
//! Workflow services only see the [`DocumentStore`] trait.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{
    DocumentStore, StorageService, UploadFile, intake_path, invoice_pdf_path,
};
