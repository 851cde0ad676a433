//! In-memory implementation of every repository trait.
//!
//! Used by the service tests and by callers that want to run the workflow
//! without a database. Writes to any table can be made to fail on demand to
//! exercise the partial-success paths.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use billtrack_shared::types::{
    BatchId, BatchItemId, ClaimId, IntakeItemId, InvoiceId, JobId, PlatformTaskId, VendorId,
};
use chrono::Utc;
use rust_decimal::Decimal;

use super::{
    BatchRepository, CollectionClaimRepository, IntakeRepository, InvoiceRepository,
    JobDirectory, PlatformTaskRepository, SapPostingRepository, StoreError, VendorDirectory,
};
use crate::batch::{BillingBatch, BillingBatchItem};
use crate::claims::CollectionClaim;
use crate::compliance::{Job, Vendor};
use crate::intake::{IntakeItem, IntakeStatus, SapPosting};
use crate::invoice::ClientInvoice;
use crate::platform::PlatformTask;

/// Writable tables of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Intake items.
    IntakeItems,
    /// Accounting postings.
    SapPostings,
    /// Billing batches.
    Batches,
    /// Billing batch items.
    BatchItems,
    /// Client invoices.
    Invoices,
    /// Platform tasks.
    PlatformTasks,
    /// Collection claims.
    Claims,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Self::IntakeItems => "intake_items",
            Self::SapPostings => "sap_postings",
            Self::Batches => "billing_batches",
            Self::BatchItems => "billing_batch_items",
            Self::Invoices => "client_invoices",
            Self::PlatformTasks => "platform_tasks",
            Self::Claims => "collection_claims",
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    jobs: Vec<Job>,
    vendors: Vec<Vendor>,
    intake_items: Vec<IntakeItem>,
    sap_postings: Vec<SapPosting>,
    batches: Vec<BillingBatch>,
    batch_items: Vec<BillingBatchItem>,
    invoices: Vec<ClientInvoice>,
    platform_tasks: Vec<PlatformTask>,
    claims: Vec<CollectionClaim>,
}

/// Repository implementation over in-process vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<Table>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces a job.
    pub fn put_job(&self, job: Job) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.jobs.retain(|j| j.id != job.id);
        tables.jobs.push(job);
        Ok(())
    }

    /// Seeds or replaces a vendor.
    pub fn put_vendor(&self, vendor: Vendor) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.vendors.retain(|v| v.id != vendor.id);
        tables.vendors.push(vendor);
        Ok(())
    }

    /// Makes every later write to `table` fail with a database error.
    pub fn fail_writes(&self, table: Table) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(table);
        }
    }

    /// Lets writes to every table succeed again.
    pub fn restore_writes(&self) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.clear();
        }
    }

    /// Number of rows currently held in `table`.
    pub fn row_count(&self, table: Table) -> usize {
        let Ok(tables) = self.tables() else {
            return 0;
        };
        match table {
            Table::IntakeItems => tables.intake_items.len(),
            Table::SapPostings => tables.sap_postings.len(),
            Table::Batches => tables.batches.len(),
            Table::BatchItems => tables.batch_items.len(),
            Table::Invoices => tables.invoices.len(),
            Table::PlatformTasks => tables.platform_tasks.len(),
            Table::Claims => tables.claims.len(),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::database("memory store lock poisoned"))
    }

    fn writable(&self, table: Table) -> Result<MutexGuard<'_, Tables>, StoreError> {
        let failing = self
            .failing
            .lock()
            .map_err(|_| StoreError::database("memory store lock poisoned"))?
            .contains(&table);
        if failing {
            return Err(StoreError::database(format!(
                "write to {} rejected",
                table.name()
            )));
        }
        self.tables()
    }
}

impl JobDirectory for MemoryStore {
    async fn find_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.tables()?.jobs.iter().find(|j| j.id == id).cloned())
    }
}

impl VendorDirectory for MemoryStore {
    async fn find_vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
        Ok(self.tables()?.vendors.iter().find(|v| v.id == id).cloned())
    }
}

impl IntakeRepository for MemoryStore {
    async fn insert_intake_item(&self, item: IntakeItem) -> Result<IntakeItem, StoreError> {
        self.writable(Table::IntakeItems)?
            .intake_items
            .push(item.clone());
        Ok(item)
    }

    async fn find_intake_item(&self, id: IntakeItemId) -> Result<Option<IntakeItem>, StoreError> {
        Ok(self
            .tables()?
            .intake_items
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_intake_items(&self, ids: &[IntakeItemId]) -> Result<Vec<IntakeItem>, StoreError> {
        Ok(self
            .tables()?
            .intake_items
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn find_duplicate_intake_item(
        &self,
        vendor_id: VendorId,
        invoice_number: &str,
        amount: Decimal,
    ) -> Result<Option<IntakeItem>, StoreError> {
        Ok(self
            .tables()?
            .intake_items
            .iter()
            .find(|i| {
                i.vendor_id == Some(vendor_id)
                    && i.invoice_number.as_deref() == Some(invoice_number)
                    && i.amount == amount
            })
            .cloned())
    }

    async fn update_intake_status(
        &self,
        id: IntakeItemId,
        status: IntakeStatus,
        rejection_reason: Option<String>,
    ) -> Result<IntakeItem, StoreError> {
        let mut tables = self.writable(Table::IntakeItems)?;
        let item = tables
            .intake_items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found("intake_item", id))?;
        item.status = status;
        item.rejection_reason = rejection_reason;
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn bulk_update_intake_status(
        &self,
        ids: &[IntakeItemId],
        status: IntakeStatus,
    ) -> Result<u64, StoreError> {
        let mut tables = self.writable(Table::IntakeItems)?;
        let now = Utc::now();
        let mut updated = 0;
        for item in tables.intake_items.iter_mut().filter(|i| ids.contains(&i.id)) {
            item.status = status;
            item.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }
}

impl SapPostingRepository for MemoryStore {
    async fn insert_sap_posting(&self, posting: SapPosting) -> Result<SapPosting, StoreError> {
        self.writable(Table::SapPostings)?
            .sap_postings
            .push(posting.clone());
        Ok(posting)
    }

    async fn list_sap_postings(
        &self,
        intake_item_id: IntakeItemId,
    ) -> Result<Vec<SapPosting>, StoreError> {
        Ok(self
            .tables()?
            .sap_postings
            .iter()
            .filter(|p| p.intake_item_id == intake_item_id)
            .cloned()
            .collect())
    }
}

impl BatchRepository for MemoryStore {
    async fn insert_batch(&self, batch: BillingBatch) -> Result<BillingBatch, StoreError> {
        self.writable(Table::Batches)?.batches.push(batch.clone());
        Ok(batch)
    }

    async fn insert_batch_items(
        &self,
        items: Vec<BillingBatchItem>,
    ) -> Result<Vec<BillingBatchItem>, StoreError> {
        self.writable(Table::BatchItems)?
            .batch_items
            .extend(items.iter().cloned());
        Ok(items)
    }

    async fn find_batch(&self, id: BatchId) -> Result<Option<BillingBatch>, StoreError> {
        Ok(self.tables()?.batches.iter().find(|b| b.id == id).cloned())
    }

    async fn find_batch_item(
        &self,
        id: BatchItemId,
    ) -> Result<Option<BillingBatchItem>, StoreError> {
        Ok(self
            .tables()?
            .batch_items
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_batch_items(&self, batch_id: BatchId) -> Result<Vec<BillingBatchItem>, StoreError> {
        Ok(self
            .tables()?
            .batch_items
            .iter()
            .filter(|i| i.batch_id == batch_id)
            .cloned()
            .collect())
    }

    async fn update_batch_item(
        &self,
        item: &BillingBatchItem,
    ) -> Result<BillingBatchItem, StoreError> {
        let mut tables = self.writable(Table::BatchItems)?;
        let row = tables
            .batch_items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| StoreError::not_found("billing_batch_item", item.id))?;
        row.attach_fee = item.attach_fee;
        row.decision = item.decision;
        Ok(row.clone())
    }

    async fn update_batch(&self, batch: &BillingBatch) -> Result<BillingBatch, StoreError> {
        let mut tables = self.writable(Table::Batches)?;
        let row = tables
            .batches
            .iter_mut()
            .find(|b| b.id == batch.id)
            .ok_or_else(|| StoreError::not_found("billing_batch", batch.id))?;
        row.status = batch.status;
        row.uttai_subject_obliged = batch.uttai_subject_obliged;
        Ok(row.clone())
    }
}

impl InvoiceRepository for MemoryStore {
    async fn insert_invoice(&self, invoice: ClientInvoice) -> Result<ClientInvoice, StoreError> {
        self.writable(Table::Invoices)?
            .invoices
            .push(invoice.clone());
        Ok(invoice)
    }

    async fn find_invoice(&self, id: InvoiceId) -> Result<Option<ClientInvoice>, StoreError> {
        Ok(self.tables()?.invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn update_invoice(&self, invoice: &ClientInvoice) -> Result<ClientInvoice, StoreError> {
        let mut tables = self.writable(Table::Invoices)?;
        let row = tables
            .invoices
            .iter_mut()
            .find(|i| i.id == invoice.id)
            .ok_or_else(|| StoreError::not_found("client_invoice", invoice.id))?;
        *row = invoice.clone();
        Ok(row.clone())
    }

    async fn list_issued_invoices(&self) -> Result<Vec<ClientInvoice>, StoreError> {
        let mut invoices: Vec<ClientInvoice> = self
            .tables()?
            .invoices
            .iter()
            .filter(|i| i.status.is_issued())
            .cloned()
            .collect();
        invoices.sort_by_key(|i| i.created_at);
        Ok(invoices)
    }
}

impl PlatformTaskRepository for MemoryStore {
    async fn insert_platform_tasks(
        &self,
        tasks: Vec<PlatformTask>,
    ) -> Result<Vec<PlatformTask>, StoreError> {
        self.writable(Table::PlatformTasks)?
            .platform_tasks
            .extend(tasks.iter().cloned());
        Ok(tasks)
    }

    async fn find_platform_task(
        &self,
        id: PlatformTaskId,
    ) -> Result<Option<PlatformTask>, StoreError> {
        Ok(self
            .tables()?
            .platform_tasks
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn list_platform_tasks(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<PlatformTask>, StoreError> {
        Ok(self
            .tables()?
            .platform_tasks
            .iter()
            .filter(|t| t.invoice_id == invoice_id)
            .cloned()
            .collect())
    }

    async fn update_platform_task(&self, task: &PlatformTask) -> Result<PlatformTask, StoreError> {
        let mut tables = self.writable(Table::PlatformTasks)?;
        let row = tables
            .platform_tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| StoreError::not_found("platform_task", task.id))?;
        *row = task.clone();
        Ok(row.clone())
    }
}

impl CollectionClaimRepository for MemoryStore {
    async fn insert_claim(&self, claim: CollectionClaim) -> Result<CollectionClaim, StoreError> {
        self.writable(Table::Claims)?.claims.push(claim.clone());
        Ok(claim)
    }

    async fn find_claim(&self, id: ClaimId) -> Result<Option<CollectionClaim>, StoreError> {
        Ok(self.tables()?.claims.iter().find(|c| c.id == id).cloned())
    }

    async fn list_claims(&self, invoice_id: InvoiceId) -> Result<Vec<CollectionClaim>, StoreError> {
        Ok(self
            .tables()?
            .claims
            .iter()
            .filter(|c| c.invoice_id == invoice_id)
            .cloned()
            .collect())
    }

    async fn update_claim(&self, claim: &CollectionClaim) -> Result<CollectionClaim, StoreError> {
        let mut tables = self.writable(Table::Claims)?;
        let row = tables
            .claims
            .iter_mut()
            .find(|c| c.id == claim.id)
            .ok_or_else(|| StoreError::not_found("collection_claim", claim.id))?;
        *row = claim.clone();
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::UttaiStatus;
    use billtrack_shared::types::UserId;

    fn batch() -> BillingBatch {
        BillingBatch {
            id: BatchId::new(),
            job_id: JobId::new(),
            status: crate::batch::BatchStatus::Draft,
            uttai_subject_obliged: false,
            created_by: UserId::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_job_replaces() {
        let store = MemoryStore::new();
        let mut job = Job {
            id: JobId::new(),
            code: "J-1".to_string(),
            client_name: "Acme".to_string(),
            client_country: None,
            uttai_status: UttaiStatus::Clear,
        };
        store.put_job(job.clone()).unwrap();
        job.uttai_status = UttaiStatus::Blocked;
        store.put_job(job.clone()).unwrap();

        let found = store.find_job(job.id).await.unwrap().unwrap();
        assert!(found.is_blocked());
    }

    #[tokio::test]
    async fn test_write_failure_injection_is_per_table() {
        let store = MemoryStore::new();
        store.fail_writes(Table::Batches);

        let err = store.insert_batch(batch()).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(msg) if msg.contains("billing_batches")));
        assert!(store.insert_batch_items(Vec::new()).await.is_ok());

        store.restore_writes();
        assert!(store.insert_batch(batch()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update_batch(&batch()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "billing_batch", .. }));
    }

    #[tokio::test]
    async fn test_reads_are_not_affected_by_failing_writes() {
        let store = MemoryStore::new();
        let b = store.insert_batch(batch()).await.unwrap();
        store.fail_writes(Table::Batches);
        assert_eq!(store.find_batch(b.id).await.unwrap(), Some(b));
    }
}
