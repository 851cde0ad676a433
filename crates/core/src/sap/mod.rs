//! Accounting audit payload assembled when a client invoice is emitted.
//!
//! The payload records the FX trail of every billed line and the supporting
//! documents attached automatically. Building it never fails: missing rates
//! and missing documents are counted so the caller can warn without blocking
//! emission.

pub mod payload;

pub use payload::{
    AttachmentWarnings, AutoAttachment, FxAudit, FxAuditLine, PayloadSummary, SapPayload,
    SapPayloadBuilder,
};
