//! Client invoice service: emission, issuing, delivery and payment.

use std::sync::Arc;
use std::time::Duration;

use billtrack_shared::types::{BatchId, IntakeItemId, InvoiceId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::InvoiceError;
use super::lifecycle::InvoiceLifecycle;
use super::types::{ClientInvoice, InvoiceStatus, RegisterSapInvoiceInput};
use crate::batch::{BatchStatus, BillingBatchItem};
use crate::collections::{CollectionSnapshot, CollectionStatus, PaymentTerms};
use crate::currency::CurrencyResolver;
use crate::intake::{IntakeItem, IntakeStatus};
use crate::outcome::Outcome;
use crate::sap::{SapPayload, SapPayloadBuilder};
use crate::storage::{DocumentStore, invoice_pdf_path};
use crate::store::{BatchRepository, IntakeRepository, InvoiceRepository};

/// Drives client invoices through their lifecycle and cascades status
/// changes back onto the intake items they bill.
pub struct InvoiceService<S, D> {
    store: Arc<S>,
    documents: Arc<D>,
    payloads: SapPayloadBuilder,
    terms: PaymentTerms,
}

impl<S, D> InvoiceService<S, D>
where
    S: InvoiceRepository + BatchRepository + IntakeRepository,
    D: DocumentStore,
{
    /// Create a new invoice service.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        documents: Arc<D>,
        resolver: CurrencyResolver,
        terms: PaymentTerms,
    ) -> Self {
        Self {
            store,
            documents,
            payloads: SapPayloadBuilder::new(resolver),
            terms,
        }
    }

    /// Creates a draft invoice from a batch with an initial audit payload,
    /// then marks the batch invoiced.
    ///
    /// Payload degradations and a failed batch update come back as warnings.
    pub async fn create_invoice_from_batch(
        &self,
        batch_id: BatchId,
        actor: UserId,
        generated_at: DateTime<Utc>,
    ) -> Result<Outcome<ClientInvoice>, InvoiceError> {
        let mut batch = self
            .store
            .find_batch(batch_id)
            .await?
            .ok_or(InvoiceError::BatchNotFound(batch_id))?;
        if batch.status == BatchStatus::Invoiced {
            return Err(InvoiceError::BatchAlreadyInvoiced(batch_id));
        }

        let (members, intake_items) = self.billable_items(batch_id).await?;
        if members.is_empty() {
            return Err(InvoiceError::BatchEmpty(batch_id));
        }
        let payload = self.payloads.build(&members, &intake_items, generated_at);
        let mut warnings = payload_warnings(batch_id, &payload);

        let now = Utc::now();
        let invoice = self
            .store
            .insert_invoice(ClientInvoice {
                id: InvoiceId::new(),
                batch_id,
                status: InvoiceStatus::InvoiceDraft,
                sap_invoice_number: None,
                sap_invoice_date: None,
                pdf_file_path: None,
                sap_payload: Some(payload.to_value()),
                due_date: None,
                amount_due_eur: None,
                collection_status: CollectionStatus::Pending,
                amount_paid_eur: Decimal::ZERO,
                paid_at: None,
                created_by: actor,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(invoice_id = %invoice.id, batch_id = %batch_id, actor = %actor, "Client invoice created");

        batch.status = BatchStatus::Invoiced;
        if let Err(err) = self.store.update_batch(&batch).await {
            warn!(batch_id = %batch_id, error = %err, "Batch not marked invoiced");
            warnings.push(format!(
                "Invoice created but batch {batch_id} could not be marked invoiced: {err}"
            ));
        }
        Ok(Outcome::with_warnings(invoice, warnings))
    }

    /// InvoiceDraft → PendingPartnerApproval.
    pub async fn request_partner_approval(
        &self,
        id: InvoiceId,
        actor: UserId,
    ) -> Result<ClientInvoice, InvoiceError> {
        let mut invoice = self.get(id).await?;
        invoice.status = InvoiceLifecycle::request_partner_approval(invoice.status)?;
        self.save(invoice, actor).await
    }

    /// PendingPartnerApproval → ReadyForSap.
    pub async fn approve_as_partner(
        &self,
        id: InvoiceId,
        actor: UserId,
    ) -> Result<ClientInvoice, InvoiceError> {
        let mut invoice = self.get(id).await?;
        invoice.status = InvoiceLifecycle::approve_as_partner(invoice.status)?;
        self.save(invoice, actor).await
    }

    /// Registers the accounting invoice and issues the client invoice.
    ///
    /// A PDF must already be stored or be supplied; every check runs before
    /// the upload. The audit payload is rebuilt from the batch, the due date
    /// resolved, and the collections fields reset to pending. After the
    /// invoice write, every non-discarded intake item of the batch is marked
    /// `billed`; a failure there is returned as a warning.
    pub async fn register_sap_invoice(
        &self,
        id: InvoiceId,
        input: RegisterSapInvoiceInput,
        actor: UserId,
    ) -> Result<Outcome<ClientInvoice>, InvoiceError> {
        let mut invoice = self.get(id).await?;
        let next = InvoiceLifecycle::issue(invoice.status)?;
        let sap_invoice_number = input.sap_invoice_number.trim().to_string();
        if sap_invoice_number.is_empty() {
            return Err(InvoiceError::SapNumberRequired);
        }
        if input.pdf.is_none() && invoice.pdf_file_path.is_none() {
            return Err(InvoiceError::MissingPdf(id));
        }

        let (members, intake_items) = self.billable_items(invoice.batch_id).await?;
        let payload = self.payloads.build(&members, &intake_items, Utc::now());
        let mut warnings = payload_warnings(invoice.batch_id, &payload);

        if let Some(pdf) = &input.pdf {
            let path = invoice_pdf_path(id, &pdf.filename);
            invoice.pdf_file_path = Some(self.documents.upload(&path, pdf).await?);
        }

        invoice.sap_invoice_number = Some(sap_invoice_number);
        invoice.sap_invoice_date = Some(input.sap_invoice_date);
        invoice.due_date = self
            .terms
            .resolve_due_date(invoice.due_date, Some(input.sap_invoice_date));
        invoice.amount_due_eur = Some(payload.fx_audit.total_amount_eur);
        invoice.sap_payload = Some(payload.to_value());
        invoice.collection_status = CollectionStatus::Pending;
        invoice.amount_paid_eur = Decimal::ZERO;
        invoice.paid_at = None;
        invoice.status = next;
        let invoice = self.save(invoice, actor).await?;

        if let Some(warning) = self
            .cascade(&invoice, &members, IntakeStatus::Billed)
            .await
        {
            warnings.push(warning);
        }
        Ok(Outcome::with_warnings(invoice, warnings))
    }

    /// Issued → Delivered, then archives the intake items of the batch.
    pub async fn create_delivery(
        &self,
        id: InvoiceId,
        actor: UserId,
    ) -> Result<Outcome<ClientInvoice>, InvoiceError> {
        let mut invoice = self.get(id).await?;
        invoice.status = InvoiceLifecycle::deliver(invoice.status)?;
        let members = self.non_discarded_members(invoice.batch_id).await?;
        let invoice = self.save(invoice, actor).await?;

        let mut outcome = Outcome::clean(invoice);
        if let Some(warning) = self
            .cascade(&outcome.value, &members, IntakeStatus::Archived)
            .await
        {
            outcome.warn(warning);
        }
        Ok(outcome)
    }

    /// Records full payment. Leaves the lifecycle status untouched.
    ///
    /// The amount paid is the resolved amount due (0 when unknown).
    pub async fn mark_as_paid(
        &self,
        id: InvoiceId,
        actor: UserId,
    ) -> Result<ClientInvoice, InvoiceError> {
        let mut invoice = self.get(id).await?;
        let snapshot = CollectionSnapshot::compute_now(&invoice.collection_fields(), self.terms);
        invoice.collection_status = CollectionStatus::Paid;
        invoice.amount_paid_eur = snapshot.amount_due_eur.unwrap_or(Decimal::ZERO);
        invoice.paid_at = Some(Utc::now());
        self.save(invoice, actor).await
    }

    /// Collections view of an invoice as of `today`, computed from the
    /// current row.
    pub async fn snapshot(
        &self,
        id: InvoiceId,
        today: NaiveDate,
    ) -> Result<CollectionSnapshot, InvoiceError> {
        let invoice = self.get(id).await?;
        Ok(CollectionSnapshot::compute(
            &invoice.collection_fields(),
            today,
            self.terms,
        ))
    }

    /// Signed download URL for the stored invoice PDF.
    pub async fn invoice_pdf_url(
        &self,
        id: InvoiceId,
        expiry: Duration,
    ) -> Result<String, InvoiceError> {
        let invoice = self.get(id).await?;
        let path = invoice.pdf_file_path.ok_or(InvoiceError::MissingPdf(id))?;
        Ok(self.documents.signed_url(&path, expiry).await?)
    }

    /// Loads an invoice.
    pub async fn get(&self, id: InvoiceId) -> Result<ClientInvoice, InvoiceError> {
        self.store
            .find_invoice(id)
            .await?
            .ok_or(InvoiceError::NotFound(id))
    }

    async fn save(
        &self,
        mut invoice: ClientInvoice,
        actor: UserId,
    ) -> Result<ClientInvoice, InvoiceError> {
        invoice.updated_at = Utc::now();
        let invoice = self.store.update_invoice(&invoice).await?;
        info!(
            invoice_id = %invoice.id,
            actor = %actor,
            status = %invoice.status,
            collection_status = invoice.collection_status.as_str(),
            "Client invoice updated"
        );
        Ok(invoice)
    }

    async fn non_discarded_members(
        &self,
        batch_id: BatchId,
    ) -> Result<Vec<BillingBatchItem>, InvoiceError> {
        Ok(self
            .store
            .list_batch_items(batch_id)
            .await?
            .into_iter()
            .filter(|item| !item.is_discarded())
            .collect())
    }

    async fn billable_items(
        &self,
        batch_id: BatchId,
    ) -> Result<(Vec<BillingBatchItem>, Vec<IntakeItem>), InvoiceError> {
        let members = self.non_discarded_members(batch_id).await?;
        let ids: Vec<IntakeItemId> = members.iter().map(|m| m.intake_item_id).collect();
        let intake_items = self.store.list_intake_items(&ids).await?;
        Ok((members, intake_items))
    }

    /// Moves the batch's non-discarded intake items to `status`.
    /// Returns a warning instead of an error on failure.
    async fn cascade(
        &self,
        invoice: &ClientInvoice,
        members: &[BillingBatchItem],
        status: IntakeStatus,
    ) -> Option<String> {
        let ids: Vec<IntakeItemId> = members.iter().map(|m| m.intake_item_id).collect();
        match self.store.bulk_update_intake_status(&ids, status).await {
            Ok(updated) => {
                info!(invoice_id = %invoice.id, status = %status, updated, "Intake items cascaded");
                None
            }
            Err(err) => {
                warn!(invoice_id = %invoice.id, status = %status, error = %err, "Intake cascade failed");
                Some(format!(
                    "Invoice {} is {} but its intake items could not be marked {}: {err}",
                    invoice.id,
                    invoice.status,
                    status.as_str()
                ))
            }
        }
    }
}

fn payload_warnings(batch_id: BatchId, payload: &SapPayload) -> Vec<String> {
    let warnings = payload.warnings();
    if !warnings.is_empty() {
        warn!(
            batch_id = %batch_id,
            missing_rates = payload.fx_audit.missing_rates_count,
            missing_files = payload.attachment_warnings.missing_files_count,
            "Audit payload degraded"
        );
    }
    warnings
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
