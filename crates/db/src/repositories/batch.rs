//! Billing batches and their items.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};

use billtrack_core::batch::{BatchStatus, BillingBatch, BillingBatchItem, Decision};
use billtrack_core::store::{BatchRepository, StoreError};
use billtrack_shared::types::{BatchId, BatchItemId, IntakeItemId, JobId, UserId};

use crate::entities::{billing_batch_items, billing_batches};
use crate::store::{PgStore, db_err, parse_column, to_utc, update_err};

impl BatchRepository for PgStore {
    async fn insert_batch(&self, batch: BillingBatch) -> Result<BillingBatch, StoreError> {
        let model = batch_to_model(&batch)
            .into_active_model()
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        batch_to_domain(model)
    }

    async fn insert_batch_items(
        &self,
        items: Vec<BillingBatchItem>,
    ) -> Result<Vec<BillingBatchItem>, StoreError> {
        if items.is_empty() {
            return Ok(items);
        }
        let models = items.iter().map(|item| item_to_model(item).into_active_model());
        billing_batch_items::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(items)
    }

    async fn find_batch(&self, id: BatchId) -> Result<Option<BillingBatch>, StoreError> {
        billing_batches::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(batch_to_domain)
            .transpose()
    }

    async fn find_batch_item(&self, id: BatchItemId) -> Result<Option<BillingBatchItem>, StoreError> {
        billing_batch_items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(item_to_domain)
            .transpose()
    }

    async fn list_batch_items(&self, batch_id: BatchId) -> Result<Vec<BillingBatchItem>, StoreError> {
        billing_batch_items::Entity::find()
            .filter(billing_batch_items::Column::BatchId.eq(batch_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(item_to_domain)
            .collect()
    }

    async fn update_batch_item(&self, item: &BillingBatchItem) -> Result<BillingBatchItem, StoreError> {
        let model = billing_batch_items::ActiveModel {
            id: Set(item.id.into_inner()),
            attach_fee: Set(item.attach_fee),
            decision: Set(item.decision.map(|d| d.as_str().to_string())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err("batch_item", item.id))?;

        item_to_domain(model)
    }

    async fn update_batch(&self, batch: &BillingBatch) -> Result<BillingBatch, StoreError> {
        let model = billing_batches::ActiveModel {
            id: Set(batch.id.into_inner()),
            status: Set(batch.status.as_str().to_string()),
            uttai_subject_obliged: Set(batch.uttai_subject_obliged),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err("batch", batch.id))?;

        batch_to_domain(model)
    }
}

fn batch_to_model(batch: &BillingBatch) -> billing_batches::Model {
    billing_batches::Model {
        id: batch.id.into_inner(),
        job_id: batch.job_id.into_inner(),
        status: batch.status.as_str().to_string(),
        uttai_subject_obliged: batch.uttai_subject_obliged,
        created_by: batch.created_by.into_inner(),
        created_at: batch.created_at.into(),
    }
}

fn batch_to_domain(model: billing_batches::Model) -> Result<BillingBatch, StoreError> {
    Ok(BillingBatch {
        id: BatchId::from_uuid(model.id),
        job_id: JobId::from_uuid(model.job_id),
        status: parse_column("batch status", &model.status, BatchStatus::parse)?,
        uttai_subject_obliged: model.uttai_subject_obliged,
        created_by: UserId::from_uuid(model.created_by),
        created_at: to_utc(model.created_at),
    })
}

fn item_to_model(item: &BillingBatchItem) -> billing_batch_items::Model {
    billing_batch_items::Model {
        id: item.id.into_inner(),
        batch_id: item.batch_id.into_inner(),
        intake_item_id: item.intake_item_id.into_inner(),
        attach_fee: item.attach_fee,
        decision: item.decision.map(|d| d.as_str().to_string()),
    }
}

fn item_to_domain(model: billing_batch_items::Model) -> Result<BillingBatchItem, StoreError> {
    Ok(BillingBatchItem {
        id: BatchItemId::from_uuid(model.id),
        batch_id: BatchId::from_uuid(model.batch_id),
        intake_item_id: IntakeItemId::from_uuid(model.intake_item_id),
        attach_fee: model.attach_fee,
        decision: model
            .decision
            .as_deref()
            .map(|d| parse_column("decision", d, Decision::parse))
            .transpose()?,
    })
}
