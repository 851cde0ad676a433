//! Billing batch aggregator.

use std::collections::HashSet;
use std::sync::Arc;

use billtrack_shared::types::{BatchId, BatchItemId, IntakeItemId, JobId, UserId};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::BatchError;
use super::types::{BatchStatus, BatchWithItems, BillingBatch, BillingBatchItem, Decision};
use crate::intake::IntakeStatus;
use crate::outcome::Outcome;
use crate::store::{BatchRepository, IntakeRepository, JobDirectory};

/// Groups posted intake items of one job into billing batches.
pub struct BatchAggregator<S> {
    store: Arc<S>,
}

impl<S> BatchAggregator<S>
where
    S: JobDirectory + IntakeRepository + BatchRepository,
{
    /// Create a new batch aggregator.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a batch for `job_id` holding the given intake items.
    ///
    /// The job's UTTAI flag is read again here. Every item must exist, belong
    /// to `job_id` and be `posted`; otherwise nothing is written. Official
    /// fees with a stored document default to `attach_fee = true`.
    ///
    /// Three independent writes follow: the batch, its items, then the
    /// intake items' move to `ready_to_bill`. A failed item insert leaves
    /// the batch without items and returns the error; a failed status
    /// update is returned as a warning.
    pub async fn create_batch(
        &self,
        job_id: JobId,
        intake_item_ids: &[IntakeItemId],
        actor: UserId,
        uttai_subject_obliged: Option<bool>,
    ) -> Result<Outcome<BatchWithItems>, BatchError> {
        let mut seen = HashSet::new();
        let ids: Vec<IntakeItemId> = intake_item_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if ids.is_empty() {
            return Err(BatchError::NoItems);
        }

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or(BatchError::JobNotFound(job_id))?;
        debug!(job_id = %job_id, uttai_status = %job.uttai_status, "Job compliance checked");
        if job.is_blocked() {
            return Err(BatchError::JobBlocked { job_id });
        }

        let loaded = self.store.list_intake_items(&ids).await?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !loaded.iter().any(|item| item.id == **id))
        {
            return Err(BatchError::IntakeItemNotFound(*missing));
        }
        for item in &loaded {
            if item.job_id != Some(job_id) {
                debug!(intake_item_id = %item.id, job_id = %job_id, "Intake item belongs to another job");
                return Err(BatchError::ItemJobMismatch { item: item.id, job_id });
            }
            if item.status != IntakeStatus::Posted {
                return Err(BatchError::InvalidItemStatus {
                    item: item.id,
                    status: item.status,
                });
            }
        }

        let fees_with_document: HashSet<IntakeItemId> = loaded
            .iter()
            .filter(|item| item.is_fee_with_document())
            .map(|item| item.id)
            .collect();

        let batch = self
            .store
            .insert_batch(BillingBatch {
                id: BatchId::new(),
                job_id,
                status: BatchStatus::Draft,
                uttai_subject_obliged: uttai_subject_obliged.unwrap_or(false),
                created_by: actor,
                created_at: Utc::now(),
            })
            .await?;

        let items: Vec<BillingBatchItem> = ids
            .iter()
            .map(|id| BillingBatchItem {
                id: BatchItemId::new(),
                batch_id: batch.id,
                intake_item_id: *id,
                attach_fee: fees_with_document.contains(id),
                decision: None,
            })
            .collect();
        let items = match self.store.insert_batch_items(items).await {
            Ok(items) => items,
            Err(err) => {
                warn!(batch_id = %batch.id, error = %err, "Batch created without items");
                return Err(err.into());
            }
        };
        info!(batch_id = %batch.id, job_id = %job_id, actor = %actor, items = items.len(), "Billing batch created");

        let mut outcome = Outcome::clean(BatchWithItems { batch, items });
        if let Err(err) = self
            .store
            .bulk_update_intake_status(&ids, IntakeStatus::ReadyToBill)
            .await
        {
            warn!(batch_id = %outcome.value.batch.id, error = %err, "Intake items not marked ready to bill");
            outcome.warn(format!(
                "Batch created but its intake items could not be marked ready to bill: {err}"
            ));
        }
        Ok(outcome)
    }

    /// Sets (or clears) the decision of one batch item.
    pub async fn set_decision(
        &self,
        batch_item_id: BatchItemId,
        decision: Option<Decision>,
    ) -> Result<BillingBatchItem, BatchError> {
        let mut item = self.editable_item(batch_item_id).await?;
        item.decision = decision;
        let item = self.store.update_batch_item(&item).await?;
        info!(batch_item_id = %batch_item_id, decision = decision.map_or("none", |d| d.as_str()), "Batch item decision set");
        Ok(item)
    }

    /// Sets whether the fee document is attached to the client invoice.
    pub async fn set_attach_fee(
        &self,
        batch_item_id: BatchItemId,
        attach_fee: bool,
    ) -> Result<BillingBatchItem, BatchError> {
        let mut item = self.editable_item(batch_item_id).await?;
        item.attach_fee = attach_fee;
        let item = self.store.update_batch_item(&item).await?;
        info!(batch_item_id = %batch_item_id, attach_fee, "Batch item attachment flag set");
        Ok(item)
    }

    /// Sets the UTTAI obliged-subject flag of a batch.
    pub async fn update_uttai_subject_obliged(
        &self,
        batch_id: BatchId,
        obliged: bool,
    ) -> Result<BillingBatch, BatchError> {
        let mut batch = self.get_batch(batch_id).await?;
        batch.uttai_subject_obliged = obliged;
        let batch = self.store.update_batch(&batch).await?;
        info!(batch_id = %batch_id, obliged, "Batch UTTAI subject flag set");
        Ok(batch)
    }

    /// Loads a batch and its items.
    pub async fn get_batch_with_items(&self, batch_id: BatchId) -> Result<BatchWithItems, BatchError> {
        let batch = self.get_batch(batch_id).await?;
        let items = self.store.list_batch_items(batch_id).await?;
        Ok(BatchWithItems { batch, items })
    }

    async fn get_batch(&self, batch_id: BatchId) -> Result<BillingBatch, BatchError> {
        self.store
            .find_batch(batch_id)
            .await?
            .ok_or(BatchError::NotFound(batch_id))
    }

    async fn editable_item(&self, batch_item_id: BatchItemId) -> Result<BillingBatchItem, BatchError> {
        let item = self
            .store
            .find_batch_item(batch_item_id)
            .await?
            .ok_or(BatchError::ItemNotFound(batch_item_id))?;
        let batch = self.get_batch(item.batch_id).await?;
        if batch.status == BatchStatus::Invoiced {
            return Err(BatchError::AlreadyInvoiced(batch.id));
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::UttaiStatus;
    use crate::intake::IntakeType;
    use crate::store::{MemoryStore, Table};
    use crate::test_support::{intake_item, job};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        store: Arc<MemoryStore>,
        aggregator: BatchAggregator<MemoryStore>,
        job_id: JobId,
        ids: Vec<IntakeItemId>,
    }

    async fn fixture(uttai: UttaiStatus) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let j = job(uttai);
        store.put_job(j.clone()).unwrap();

        let mut fee = intake_item(
            j.id,
            IntakeType::OfficialFee,
            "EUR",
            dec!(50),
            Decimal::ONE,
            IntakeStatus::Posted,
        );
        fee.file_path = Some("intake/u/1.pdf".to_string());
        let bare_fee = intake_item(
            j.id,
            IntakeType::OfficialFee,
            "EUR",
            dec!(20),
            Decimal::ONE,
            IntakeStatus::Posted,
        );
        let invoice = intake_item(
            j.id,
            IntakeType::VendorInvoice,
            "USD",
            dec!(100),
            dec!(0.9),
            IntakeStatus::Posted,
        );
        let mut ids = Vec::new();
        for item in [fee, bare_fee, invoice] {
            ids.push(store.insert_intake_item(item).await.unwrap().id);
        }

        Fixture {
            aggregator: BatchAggregator::new(Arc::clone(&store)),
            store,
            job_id: j.id,
            ids,
        }
    }

    #[tokio::test]
    async fn test_create_batch_defaults_and_cascade() {
        let f = fixture(UttaiStatus::Clear).await;

        let outcome = f
            .aggregator
            .create_batch(f.job_id, &f.ids, UserId::new(), Some(true))
            .await
            .unwrap();

        assert!(outcome.is_clean());
        let created = outcome.value;
        assert_eq!(created.batch.status, BatchStatus::Draft);
        assert!(created.batch.uttai_subject_obliged);
        let attach: Vec<bool> = created.items.iter().map(|i| i.attach_fee).collect();
        assert_eq!(attach, vec![true, false, false]);
        assert!(created.items.iter().all(|i| i.decision.is_none()));

        let items = f.store.list_intake_items(&f.ids).await.unwrap();
        assert!(items.iter().all(|i| i.status == IntakeStatus::ReadyToBill));
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_collapsed() {
        let f = fixture(UttaiStatus::Clear).await;
        let ids = vec![f.ids[0], f.ids[0], f.ids[1]];
        let outcome = f
            .aggregator
            .create_batch(f.job_id, &ids, UserId::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.value.items.len(), 2);
    }

    #[tokio::test]
    async fn test_blocked_job_refused_before_writes() {
        let f = fixture(UttaiStatus::Blocked).await;
        let err = f
            .aggregator
            .create_batch(f.job_id, &f.ids, UserId::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::JobBlocked { .. }));
        assert_eq!(f.store.row_count(Table::Batches), 0);
    }

    #[tokio::test]
    async fn test_unknown_intake_item_refused_before_writes() {
        let f = fixture(UttaiStatus::Clear).await;
        let unknown = IntakeItemId::new();
        let ids = vec![f.ids[0], unknown];

        let err = f
            .aggregator
            .create_batch(f.job_id, &ids, UserId::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, BatchError::IntakeItemNotFound(id) if id == unknown));
        assert_eq!(err.status_code(), 404);
        assert_eq!(f.store.row_count(Table::Batches), 0);
        assert_eq!(f.store.row_count(Table::BatchItems), 0);
        let kept = f.store.find_intake_item(f.ids[0]).await.unwrap().unwrap();
        assert_eq!(kept.status, IntakeStatus::Posted);
    }

    #[tokio::test]
    async fn test_item_of_blocked_job_cannot_ride_on_clear_job() {
        let f = fixture(UttaiStatus::Clear).await;
        let blocked = job(UttaiStatus::Blocked);
        f.store.put_job(blocked.clone()).unwrap();
        let foreign = f
            .store
            .insert_intake_item(intake_item(
                blocked.id,
                IntakeType::VendorInvoice,
                "EUR",
                dec!(10),
                Decimal::ONE,
                IntakeStatus::Posted,
            ))
            .await
            .unwrap();

        let err = f
            .aggregator
            .create_batch(f.job_id, &[f.ids[0], foreign.id], UserId::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, BatchError::ItemJobMismatch { item, .. } if item == foreign.id));
        assert_eq!(err.error_code(), "ITEM_JOB_MISMATCH");
        assert_eq!(f.store.row_count(Table::Batches), 0);
        let foreign = f.store.find_intake_item(foreign.id).await.unwrap().unwrap();
        assert_eq!(foreign.status, IntakeStatus::Posted);
    }

    #[tokio::test]
    async fn test_draft_item_refused() {
        let f = fixture(UttaiStatus::Clear).await;
        let draft = f
            .store
            .insert_intake_item(intake_item(
                f.job_id,
                IntakeType::VendorInvoice,
                "EUR",
                dec!(10),
                Decimal::ONE,
                IntakeStatus::Draft,
            ))
            .await
            .unwrap();

        let err = f
            .aggregator
            .create_batch(f.job_id, &[draft.id], UserId::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BatchError::InvalidItemStatus { status: IntakeStatus::Draft, .. }
        ));
        assert_eq!(err.status_code(), 422);
        assert_eq!(f.store.row_count(Table::Batches), 0);
        let draft = f.store.find_intake_item(draft.id).await.unwrap().unwrap();
        assert_eq!(draft.status, IntakeStatus::Draft);
    }

    #[tokio::test]
    async fn test_empty_batch_refused() {
        let f = fixture(UttaiStatus::Clear).await;
        let err = f
            .aggregator
            .create_batch(f.job_id, &[], UserId::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::NoItems));
    }

    #[tokio::test]
    async fn test_item_insert_failure_leaves_orphan_batch() {
        let f = fixture(UttaiStatus::Clear).await;
        f.store.fail_writes(Table::BatchItems);

        let err = f
            .aggregator
            .create_batch(f.job_id, &f.ids, UserId::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, BatchError::Store(_)));
        assert_eq!(f.store.row_count(Table::Batches), 1);
        assert_eq!(f.store.row_count(Table::BatchItems), 0);
        let items = f.store.list_intake_items(&f.ids).await.unwrap();
        assert!(items.iter().all(|i| i.status == IntakeStatus::Posted));
    }

    #[tokio::test]
    async fn test_status_cascade_failure_is_a_warning() {
        let f = fixture(UttaiStatus::Clear).await;
        f.store.fail_writes(Table::IntakeItems);

        let outcome = f
            .aggregator
            .create_batch(f.job_id, &f.ids, UserId::new(), None)
            .await
            .unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.value.items.len(), 3);
    }

    #[tokio::test]
    async fn test_decision_and_attach_fee_updates() {
        let f = fixture(UttaiStatus::Clear).await;
        let created = f
            .aggregator
            .create_batch(f.job_id, &f.ids, UserId::new(), None)
            .await
            .unwrap()
            .value;
        let target = created.items[1].id;

        f.aggregator
            .set_decision(target, Some(Decision::Discard))
            .await
            .unwrap();
        f.aggregator.set_attach_fee(target, true).await.unwrap();
        let obliged = f
            .aggregator
            .update_uttai_subject_obliged(created.batch.id, true)
            .await
            .unwrap();

        let loaded = f
            .aggregator
            .get_batch_with_items(created.batch.id)
            .await
            .unwrap();
        let item = loaded.items.iter().find(|i| i.id == target).unwrap();
        assert!(item.is_discarded());
        assert!(item.attach_fee);
        assert!(obliged.uttai_subject_obliged);
        assert!(loaded.items.iter().filter(|i| i.id != target).all(|i| i.decision.is_none()));
    }

    #[tokio::test]
    async fn test_invoiced_batch_is_locked() {
        let f = fixture(UttaiStatus::Clear).await;
        let created = f
            .aggregator
            .create_batch(f.job_id, &f.ids, UserId::new(), None)
            .await
            .unwrap()
            .value;
        let mut batch = created.batch.clone();
        batch.status = BatchStatus::Invoiced;
        f.store.update_batch(&batch).await.unwrap();

        let err = f
            .aggregator
            .set_decision(created.items[0].id, Some(Decision::Emit))
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::AlreadyInvoiced(_)));
    }

    #[tokio::test]
    async fn test_unknown_batch_item() {
        let f = fixture(UttaiStatus::Clear).await;
        let err = f
            .aggregator
            .set_attach_fee(BatchItemId::new(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::ItemNotFound(_)));
        assert_eq!(err.status_code(), 404);
    }
}
