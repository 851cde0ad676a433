//! Client invoices.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use billtrack_core::collections::CollectionStatus;
use billtrack_core::invoice::{ClientInvoice, InvoiceStatus};
use billtrack_core::store::{InvoiceRepository, StoreError};
use billtrack_shared::types::{BatchId, InvoiceId, UserId};

use crate::entities::client_invoices;
use crate::store::{PgStore, db_err, parse_column, to_utc, update_err};

const ISSUED_STATUSES: [InvoiceStatus; 4] = [
    InvoiceStatus::Issued,
    InvoiceStatus::Delivered,
    InvoiceStatus::PlatformRequired,
    InvoiceStatus::PlatformCompleted,
];

impl InvoiceRepository for PgStore {
    async fn insert_invoice(&self, invoice: ClientInvoice) -> Result<ClientInvoice, StoreError> {
        let model = to_model(&invoice)
            .into_active_model()
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        to_domain(model)
    }

    async fn find_invoice(&self, id: InvoiceId) -> Result<Option<ClientInvoice>, StoreError> {
        client_invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn update_invoice(&self, invoice: &ClientInvoice) -> Result<ClientInvoice, StoreError> {
        // Every column is written; the active model is marked fully dirty.
        let model = to_model(invoice)
            .into_active_model()
            .reset_all()
            .update(&self.db)
            .await
            .map_err(update_err("invoice", invoice.id))?;

        to_domain(model)
    }

    async fn list_issued_invoices(&self) -> Result<Vec<ClientInvoice>, StoreError> {
        client_invoices::Entity::find()
            .filter(client_invoices::Column::Status.is_in(ISSUED_STATUSES.map(|s| s.as_str())))
            .order_by_asc(client_invoices::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}

fn to_model(invoice: &ClientInvoice) -> client_invoices::Model {
    client_invoices::Model {
        id: invoice.id.into_inner(),
        batch_id: invoice.batch_id.into_inner(),
        status: invoice.status.as_str().to_string(),
        sap_invoice_number: invoice.sap_invoice_number.clone(),
        sap_invoice_date: invoice.sap_invoice_date,
        pdf_file_path: invoice.pdf_file_path.clone(),
        sap_payload: invoice.sap_payload.clone(),
        due_date: invoice.due_date,
        amount_due_eur: invoice.amount_due_eur,
        collection_status: invoice.collection_status.as_str().to_string(),
        amount_paid_eur: invoice.amount_paid_eur,
        paid_at: invoice.paid_at.map(Into::into),
        created_by: invoice.created_by.into_inner(),
        created_at: invoice.created_at.into(),
        updated_at: invoice.updated_at.into(),
    }
}

fn to_domain(model: client_invoices::Model) -> Result<ClientInvoice, StoreError> {
    Ok(ClientInvoice {
        id: InvoiceId::from_uuid(model.id),
        batch_id: BatchId::from_uuid(model.batch_id),
        status: parse_column("invoice status", &model.status, InvoiceStatus::parse)?,
        sap_invoice_number: model.sap_invoice_number,
        sap_invoice_date: model.sap_invoice_date,
        pdf_file_path: model.pdf_file_path,
        sap_payload: model.sap_payload,
        due_date: model.due_date,
        amount_due_eur: model.amount_due_eur,
        collection_status: parse_column(
            "collection_status",
            &model.collection_status,
            CollectionStatus::parse,
        )?,
        amount_paid_eur: model.amount_paid_eur,
        paid_at: model.paid_at.map(to_utc),
        created_by: UserId::from_uuid(model.created_by),
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}
