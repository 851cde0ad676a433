//! Collection claims. Recipient lists are stored as JSONB arrays.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;

use billtrack_core::claims::{ClaimStatus, CollectionClaim};
use billtrack_core::store::{CollectionClaimRepository, StoreError};
use billtrack_shared::types::{ClaimId, InvoiceId, UserId};

use crate::entities::collection_claims;
use crate::store::{PgStore, db_err, parse_column, to_utc, update_err};

impl CollectionClaimRepository for PgStore {
    async fn insert_claim(&self, claim: CollectionClaim) -> Result<CollectionClaim, StoreError> {
        let model = collection_claims::Model {
            id: claim.id.into_inner(),
            invoice_id: claim.invoice_id.into_inner(),
            to_recipients: recipients_to_json(&claim.to_recipients),
            cc_recipients: recipients_to_json(&claim.cc_recipients),
            responsible_recipients: recipients_to_json(&claim.responsible_recipients),
            body: claim.body,
            status: claim.status.as_str().to_string(),
            rejection_reason: claim.rejection_reason,
            created_by: claim.created_by.into_inner(),
            reviewed_by: claim.reviewed_by.map(UserId::into_inner),
            sent_at: claim.sent_at.map(Into::into),
            created_at: claim.created_at.into(),
            updated_at: claim.updated_at.into(),
        }
        .into_active_model()
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        to_domain(model)
    }

    async fn find_claim(&self, id: ClaimId) -> Result<Option<CollectionClaim>, StoreError> {
        collection_claims::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn list_claims(&self, invoice_id: InvoiceId) -> Result<Vec<CollectionClaim>, StoreError> {
        collection_claims::Entity::find()
            .filter(collection_claims::Column::InvoiceId.eq(invoice_id.into_inner()))
            .order_by_asc(collection_claims::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn update_claim(&self, claim: &CollectionClaim) -> Result<CollectionClaim, StoreError> {
        let model = collection_claims::ActiveModel {
            id: Set(claim.id.into_inner()),
            status: Set(claim.status.as_str().to_string()),
            rejection_reason: Set(claim.rejection_reason.clone()),
            reviewed_by: Set(claim.reviewed_by.map(UserId::into_inner)),
            sent_at: Set(claim.sent_at.map(Into::into)),
            updated_at: Set(claim.updated_at.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err("claim", claim.id))?;

        to_domain(model)
    }
}

fn recipients_to_json(recipients: &[String]) -> Value {
    Value::Array(recipients.iter().cloned().map(Value::String).collect())
}

fn recipients_from_json(column: &'static str, value: Value) -> Result<Vec<String>, StoreError> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::database(format!("malformed {column}: {e}")))
}

fn to_domain(model: collection_claims::Model) -> Result<CollectionClaim, StoreError> {
    Ok(CollectionClaim {
        id: ClaimId::from_uuid(model.id),
        invoice_id: InvoiceId::from_uuid(model.invoice_id),
        to_recipients: recipients_from_json("to_recipients", model.to_recipients)?,
        cc_recipients: recipients_from_json("cc_recipients", model.cc_recipients)?,
        responsible_recipients: recipients_from_json(
            "responsible_recipients",
            model.responsible_recipients,
        )?,
        body: model.body,
        status: parse_column("claim status", &model.status, ClaimStatus::parse)?,
        rejection_reason: model.rejection_reason,
        created_by: UserId::from_uuid(model.created_by),
        reviewed_by: model.reviewed_by.map(UserId::from_uuid),
        sent_at: model.sent_at.map(to_utc),
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}
