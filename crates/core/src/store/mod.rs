//! Persistence seam.
//!
//! The workflow services talk to storage only through these traits. Each
//! call is one independent read or write: nothing here is transactional and
//! nothing is cached, so every read returns the current row.
//!
//! The db crate implements the traits on SeaORM; [`MemoryStore`] implements
//! them in memory.

mod error;
mod memory;

use std::future::Future;

use billtrack_shared::types::{
    BatchId, BatchItemId, ClaimId, IntakeItemId, InvoiceId, JobId, PlatformTaskId, VendorId,
};
use rust_decimal::Decimal;

use crate::batch::{BillingBatch, BillingBatchItem};
use crate::claims::CollectionClaim;
use crate::compliance::{Job, Vendor};
use crate::intake::{IntakeItem, IntakeStatus, SapPosting};
use crate::invoice::ClientInvoice;
use crate::platform::PlatformTask;

pub use error::StoreError;
pub use memory::{MemoryStore, Table};

/// Read-only lookup of jobs and their UTTAI flag.
pub trait JobDirectory: Send + Sync {
    /// Finds a job by ID.
    fn find_job(&self, id: JobId) -> impl Future<Output = Result<Option<Job>, StoreError>> + Send;
}

/// Read-only lookup of vendors and their compliance status.
pub trait VendorDirectory: Send + Sync {
    /// Finds a vendor by ID.
    fn find_vendor(
        &self,
        id: VendorId,
    ) -> impl Future<Output = Result<Option<Vendor>, StoreError>> + Send;
}

/// Intake item persistence.
pub trait IntakeRepository: Send + Sync {
    /// Inserts a new item.
    fn insert_intake_item(
        &self,
        item: IntakeItem,
    ) -> impl Future<Output = Result<IntakeItem, StoreError>> + Send;

    /// Finds an item by ID.
    fn find_intake_item(
        &self,
        id: IntakeItemId,
    ) -> impl Future<Output = Result<Option<IntakeItem>, StoreError>> + Send;

    /// Lists the items with the given IDs; unknown IDs are skipped.
    fn list_intake_items(
        &self,
        ids: &[IntakeItemId],
    ) -> impl Future<Output = Result<Vec<IntakeItem>, StoreError>> + Send;

    /// Finds an item matching the `(vendor, invoice number, amount)` triple.
    fn find_duplicate_intake_item(
        &self,
        vendor_id: VendorId,
        invoice_number: &str,
        amount: Decimal,
    ) -> impl Future<Output = Result<Option<IntakeItem>, StoreError>> + Send;

    /// Sets the status (and rejection reason) of one item.
    fn update_intake_status(
        &self,
        id: IntakeItemId,
        status: IntakeStatus,
        rejection_reason: Option<String>,
    ) -> impl Future<Output = Result<IntakeItem, StoreError>> + Send;

    /// Sets the status of many items in one write; returns the rows updated.
    fn bulk_update_intake_status(
        &self,
        ids: &[IntakeItemId],
        status: IntakeStatus,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Accounting posting persistence (append-only).
pub trait SapPostingRepository: Send + Sync {
    /// Appends a posting.
    fn insert_sap_posting(
        &self,
        posting: SapPosting,
    ) -> impl Future<Output = Result<SapPosting, StoreError>> + Send;

    /// Lists the postings of an intake item, oldest first.
    fn list_sap_postings(
        &self,
        intake_item_id: IntakeItemId,
    ) -> impl Future<Output = Result<Vec<SapPosting>, StoreError>> + Send;
}

/// Billing batch persistence.
pub trait BatchRepository: Send + Sync {
    /// Inserts a batch.
    fn insert_batch(
        &self,
        batch: BillingBatch,
    ) -> impl Future<Output = Result<BillingBatch, StoreError>> + Send;

    /// Inserts the items of a batch in one write.
    fn insert_batch_items(
        &self,
        items: Vec<BillingBatchItem>,
    ) -> impl Future<Output = Result<Vec<BillingBatchItem>, StoreError>> + Send;

    /// Finds a batch by ID.
    fn find_batch(
        &self,
        id: BatchId,
    ) -> impl Future<Output = Result<Option<BillingBatch>, StoreError>> + Send;

    /// Finds a batch item by ID.
    fn find_batch_item(
        &self,
        id: BatchItemId,
    ) -> impl Future<Output = Result<Option<BillingBatchItem>, StoreError>> + Send;

    /// Lists the items of a batch in creation order.
    fn list_batch_items(
        &self,
        batch_id: BatchId,
    ) -> impl Future<Output = Result<Vec<BillingBatchItem>, StoreError>> + Send;

    /// Writes the mutable fields of a batch item.
    fn update_batch_item(
        &self,
        item: &BillingBatchItem,
    ) -> impl Future<Output = Result<BillingBatchItem, StoreError>> + Send;

    /// Writes the mutable fields of a batch.
    fn update_batch(
        &self,
        batch: &BillingBatch,
    ) -> impl Future<Output = Result<BillingBatch, StoreError>> + Send;
}

/// Client invoice persistence.
pub trait InvoiceRepository: Send + Sync {
    /// Inserts an invoice.
    fn insert_invoice(
        &self,
        invoice: ClientInvoice,
    ) -> impl Future<Output = Result<ClientInvoice, StoreError>> + Send;

    /// Finds an invoice by ID.
    fn find_invoice(
        &self,
        id: InvoiceId,
    ) -> impl Future<Output = Result<Option<ClientInvoice>, StoreError>> + Send;

    /// Writes every mutable field of an invoice.
    fn update_invoice(
        &self,
        invoice: &ClientInvoice,
    ) -> impl Future<Output = Result<ClientInvoice, StoreError>> + Send;

    /// Lists invoices that reached `issued` or later, oldest first.
    fn list_issued_invoices(
        &self,
    ) -> impl Future<Output = Result<Vec<ClientInvoice>, StoreError>> + Send;
}

/// Platform task persistence.
pub trait PlatformTaskRepository: Send + Sync {
    /// Inserts tasks in one write.
    fn insert_platform_tasks(
        &self,
        tasks: Vec<PlatformTask>,
    ) -> impl Future<Output = Result<Vec<PlatformTask>, StoreError>> + Send;

    /// Finds a task by ID.
    fn find_platform_task(
        &self,
        id: PlatformTaskId,
    ) -> impl Future<Output = Result<Option<PlatformTask>, StoreError>> + Send;

    /// Lists the tasks of an invoice.
    fn list_platform_tasks(
        &self,
        invoice_id: InvoiceId,
    ) -> impl Future<Output = Result<Vec<PlatformTask>, StoreError>> + Send;

    /// Writes the mutable fields of a task.
    fn update_platform_task(
        &self,
        task: &PlatformTask,
    ) -> impl Future<Output = Result<PlatformTask, StoreError>> + Send;
}

/// Collection claim persistence.
pub trait CollectionClaimRepository: Send + Sync {
    /// Inserts a claim.
    fn insert_claim(
        &self,
        claim: CollectionClaim,
    ) -> impl Future<Output = Result<CollectionClaim, StoreError>> + Send;

    /// Finds a claim by ID.
    fn find_claim(
        &self,
        id: ClaimId,
    ) -> impl Future<Output = Result<Option<CollectionClaim>, StoreError>> + Send;

    /// Lists the claims of an invoice, oldest first.
    fn list_claims(
        &self,
        invoice_id: InvoiceId,
    ) -> impl Future<Output = Result<Vec<CollectionClaim>, StoreError>> + Send;

    /// Writes the mutable fields of a claim.
    fn update_claim(
        &self,
        claim: &CollectionClaim,
    ) -> impl Future<Output = Result<CollectionClaim, StoreError>> + Send;
}
