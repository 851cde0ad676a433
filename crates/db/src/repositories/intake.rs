//! Intake items and their accounting postings.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use billtrack_core::compliance::{UttaiStatus, VendorCompliance};
use billtrack_core::intake::{IntakeItem, IntakeStatus, IntakeType, SapPosting};
use billtrack_core::store::{IntakeRepository, SapPostingRepository, StoreError};
use billtrack_shared::types::{IntakeItemId, JobId, SapPostingId, UserId, VendorId};

use crate::entities::{intake_items, sap_postings};
use crate::store::{PgStore, db_err, parse_column, to_utc, update_err};

impl IntakeRepository for PgStore {
    async fn insert_intake_item(&self, item: IntakeItem) -> Result<IntakeItem, StoreError> {
        let model = intake_items::ActiveModel {
            id: Set(item.id.into_inner()),
            item_type: Set(item.item_type.as_str().to_string()),
            job_id: Set(item.job_id.map(JobId::into_inner)),
            vendor_id: Set(item.vendor_id.map(VendorId::into_inner)),
            invoice_number: Set(item.invoice_number),
            concept: Set(item.concept),
            organism: Set(item.organism),
            tariff: Set(item.tariff),
            currency: Set(item.currency),
            amount: Set(item.amount),
            exchange_rate_to_eur: Set(item.exchange_rate_to_eur),
            amount_eur: Set(item.amount_eur),
            status: Set(item.status.as_str().to_string()),
            file_path: Set(item.file_path),
            uttai_status_snapshot: Set(item.uttai_status_snapshot.map(|s| s.as_str().to_string())),
            vendor_compliance_snapshot: Set(item
                .vendor_compliance_snapshot
                .map(|s| s.as_str().to_string())),
            rejection_reason: Set(item.rejection_reason),
            created_by: Set(item.created_by.into_inner()),
            created_at: Set(item.created_at.into()),
            updated_at: Set(item.updated_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        item_to_domain(model)
    }

    async fn find_intake_item(&self, id: IntakeItemId) -> Result<Option<IntakeItem>, StoreError> {
        intake_items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(item_to_domain)
            .transpose()
    }

    async fn list_intake_items(&self, ids: &[IntakeItemId]) -> Result<Vec<IntakeItem>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        intake_items::Entity::find()
            .filter(intake_items::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .order_by_asc(intake_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(item_to_domain)
            .collect()
    }

    async fn find_duplicate_intake_item(
        &self,
        vendor_id: VendorId,
        invoice_number: &str,
        amount: Decimal,
    ) -> Result<Option<IntakeItem>, StoreError> {
        intake_items::Entity::find()
            .filter(intake_items::Column::VendorId.eq(vendor_id.into_inner()))
            .filter(intake_items::Column::InvoiceNumber.eq(invoice_number))
            .filter(intake_items::Column::Amount.eq(amount))
            .order_by_asc(intake_items::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(item_to_domain)
            .transpose()
    }

    async fn update_intake_status(
        &self,
        id: IntakeItemId,
        status: IntakeStatus,
        rejection_reason: Option<String>,
    ) -> Result<IntakeItem, StoreError> {
        let model = intake_items::ActiveModel {
            id: Set(id.into_inner()),
            status: Set(status.as_str().to_string()),
            rejection_reason: Set(rejection_reason),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err("intake_item", id))?;

        item_to_domain(model)
    }

    async fn bulk_update_intake_status(
        &self,
        ids: &[IntakeItemId],
        status: IntakeStatus,
    ) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = intake_items::Entity::update_many()
            .col_expr(intake_items::Column::Status, Expr::value(status.as_str()))
            .col_expr(
                intake_items::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(intake_items::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

impl SapPostingRepository for PgStore {
    async fn insert_sap_posting(&self, posting: SapPosting) -> Result<SapPosting, StoreError> {
        let model = sap_postings::Model {
            id: posting.id.into_inner(),
            intake_item_id: posting.intake_item_id.into_inner(),
            sap_reference: posting.sap_reference,
            posted_by: posting.posted_by.into_inner(),
            posted_at: posting.posted_at.into(),
        }
        .into_active_model()
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(posting_to_domain(model))
    }

    async fn list_sap_postings(
        &self,
        intake_item_id: IntakeItemId,
    ) -> Result<Vec<SapPosting>, StoreError> {
        let models = sap_postings::Entity::find()
            .filter(sap_postings::Column::IntakeItemId.eq(intake_item_id.into_inner()))
            .order_by_asc(sap_postings::Column::PostedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(posting_to_domain).collect())
    }
}

fn item_to_domain(model: intake_items::Model) -> Result<IntakeItem, StoreError> {
    Ok(IntakeItem {
        id: IntakeItemId::from_uuid(model.id),
        item_type: parse_column("item_type", &model.item_type, IntakeType::parse)?,
        job_id: model.job_id.map(JobId::from_uuid),
        vendor_id: model.vendor_id.map(VendorId::from_uuid),
        invoice_number: model.invoice_number,
        concept: model.concept,
        organism: model.organism,
        tariff: model.tariff,
        currency: model.currency,
        amount: model.amount,
        exchange_rate_to_eur: model.exchange_rate_to_eur,
        amount_eur: model.amount_eur,
        status: parse_column("intake status", &model.status, IntakeStatus::parse)?,
        file_path: model.file_path,
        uttai_status_snapshot: model
            .uttai_status_snapshot
            .as_deref()
            .map(|s| parse_column("uttai_status_snapshot", s, UttaiStatus::parse))
            .transpose()?,
        vendor_compliance_snapshot: model
            .vendor_compliance_snapshot
            .as_deref()
            .map(|s| parse_column("vendor_compliance_snapshot", s, VendorCompliance::parse))
            .transpose()?,
        rejection_reason: model.rejection_reason,
        created_by: UserId::from_uuid(model.created_by),
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

fn posting_to_domain(model: sap_postings::Model) -> SapPosting {
    SapPosting {
        id: SapPostingId::from_uuid(model.id),
        intake_item_id: IntakeItemId::from_uuid(model.intake_item_id),
        sap_reference: model.sap_reference,
        posted_by: UserId::from_uuid(model.posted_by),
        posted_at: to_utc(model.posted_at),
    }
}
