//! Intake ledger: guarded creation and operator transitions.

use std::sync::Arc;

use billtrack_shared::types::{IntakeItemId, SapPostingId, UserId};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::IntakeError;
use super::types::{CreateIntakeInput, IntakeItem, IntakeStatus, IntakeType, SapPosting};
use super::workflow::IntakeWorkflow;
use crate::compliance::{UttaiStatus, VendorCompliance};
use crate::currency::CurrencyResolver;
use crate::outcome::Outcome;
use crate::storage::{DocumentStore, UploadFile, intake_path};
use crate::store::{IntakeRepository, JobDirectory, SapPostingRepository, VendorDirectory};

/// Creates intake items and moves them through approval and posting.
pub struct IntakeLedger<S, D> {
    store: Arc<S>,
    documents: Arc<D>,
    resolver: CurrencyResolver,
}

impl<S, D> IntakeLedger<S, D>
where
    S: JobDirectory + VendorDirectory + IntakeRepository + SapPostingRepository,
    D: DocumentStore,
{
    /// Create a new intake ledger.
    #[must_use]
    pub fn new(store: Arc<S>, documents: Arc<D>, resolver: CurrencyResolver) -> Self {
        Self {
            store,
            documents,
            resolver,
        }
    }

    /// Registers a new intake item in `draft`.
    ///
    /// # Order of checks
    ///
    /// 1. job UTTAI flag (`JobBlocked`)
    /// 2. vendor compliance for vendor invoices (`VendorNonCompliant`)
    /// 3. duplicate `(vendor, invoice number, amount)` for vendor invoices
    /// 4. currency resolution (`MissingRate`, `InvalidAmount`)
    /// 5. supporting document upload (`Upload`)
    /// 6. insert
    ///
    /// Nothing is uploaded or written when a step fails. Currency resolution
    /// runs before the upload so a refused item never leaves a stored file.
    pub async fn create_item(
        &self,
        input: CreateIntakeInput,
        actor: UserId,
        file: Option<UploadFile>,
    ) -> Result<IntakeItem, IntakeError> {
        let uttai_status_snapshot = self.check_job(&input).await?;
        let vendor_compliance_snapshot = self.check_vendor(&input).await?;
        let invoice_number = input.normalized_invoice_number();
        self.check_duplicate(&input, invoice_number.as_deref()).await?;

        let fx = self
            .resolver
            .resolve(&input.currency, input.amount, input.exchange_rate_to_eur)?;

        let now = Utc::now();
        let file_path = match &file {
            Some(file) => {
                let path = intake_path(actor, now, &file.filename);
                Some(self.documents.upload(&path, file).await?)
            }
            None => None,
        };

        let item = IntakeItem {
            id: IntakeItemId::new(),
            item_type: input.item_type,
            job_id: input.job_id,
            vendor_id: input.vendor_id,
            invoice_number,
            concept: trimmed(input.concept),
            organism: trimmed(input.organism),
            tariff: trimmed(input.tariff),
            currency: input.currency.trim().to_uppercase(),
            amount: input.amount,
            exchange_rate_to_eur: fx.exchange_rate_to_eur,
            amount_eur: fx.amount_eur,
            status: IntakeStatus::Draft,
            file_path,
            uttai_status_snapshot,
            vendor_compliance_snapshot,
            rejection_reason: None,
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        let item = self.store.insert_intake_item(item).await?;
        info!(
            intake_item_id = %item.id,
            actor = %actor,
            item_type = item.item_type.as_str(),
            amount_eur = %item.amount_eur,
            "Intake item created"
        );
        Ok(item)
    }

    /// Draft → Submitted.
    pub async fn submit(&self, id: IntakeItemId, actor: UserId) -> Result<IntakeItem, IntakeError> {
        let item = self.get(id).await?;
        let next = IntakeWorkflow::submit(item.status)?;
        self.transition(id, next, None, actor).await
    }

    /// Submitted → Approved.
    pub async fn approve(&self, id: IntakeItemId, actor: UserId) -> Result<IntakeItem, IntakeError> {
        let item = self.get(id).await?;
        let next = IntakeWorkflow::approve(item.status)?;
        self.transition(id, next, None, actor).await
    }

    /// Submitted → Rejected, recording the reason.
    pub async fn reject(
        &self,
        id: IntakeItemId,
        actor: UserId,
        reason: &str,
    ) -> Result<IntakeItem, IntakeError> {
        let item = self.get(id).await?;
        let (next, reason) = IntakeWorkflow::reject(item.status, reason)?;
        self.transition(id, next, Some(reason), actor).await
    }

    /// Approved → SentToAccounting.
    pub async fn send_to_accounting(
        &self,
        id: IntakeItemId,
        actor: UserId,
    ) -> Result<IntakeItem, IntakeError> {
        let item = self.get(id).await?;
        let next = IntakeWorkflow::send_to_accounting(item.status)?;
        self.transition(id, next, None, actor).await
    }

    /// Appends the accounting posting, then moves the item to `posted`.
    ///
    /// The posting is the primary write. If the status update fails
    /// afterwards the posting stays and the failure is returned as a warning.
    pub async fn register_sap_posting(
        &self,
        id: IntakeItemId,
        sap_reference: &str,
        actor: UserId,
    ) -> Result<Outcome<SapPosting>, IntakeError> {
        let sap_reference = sap_reference.trim();
        if sap_reference.is_empty() {
            return Err(IntakeError::SapReferenceRequired);
        }
        let item = self.get(id).await?;
        let next = IntakeWorkflow::post(item.status)?;

        let posting = self
            .store
            .insert_sap_posting(SapPosting {
                id: SapPostingId::new(),
                intake_item_id: id,
                sap_reference: sap_reference.to_string(),
                posted_by: actor,
                posted_at: Utc::now(),
            })
            .await?;
        info!(intake_item_id = %id, sap_reference, actor = %actor, "Accounting posting registered");

        let mut outcome = Outcome::clean(posting);
        if let Err(err) = self.store.update_intake_status(id, next, None).await {
            warn!(intake_item_id = %id, error = %err, "Posting saved but item status not updated");
            outcome.warn(format!(
                "Posting registered but intake item {id} could not be marked posted: {err}"
            ));
        }
        Ok(outcome)
    }

    /// Loads an item.
    pub async fn get(&self, id: IntakeItemId) -> Result<IntakeItem, IntakeError> {
        self.store
            .find_intake_item(id)
            .await?
            .ok_or(IntakeError::NotFound(id))
    }

    async fn transition(
        &self,
        id: IntakeItemId,
        next: IntakeStatus,
        rejection_reason: Option<String>,
        actor: UserId,
    ) -> Result<IntakeItem, IntakeError> {
        let item = self
            .store
            .update_intake_status(id, next, rejection_reason)
            .await?;
        info!(intake_item_id = %id, actor = %actor, status = %next, "Intake item status changed");
        Ok(item)
    }

    async fn check_job(&self, input: &CreateIntakeInput) -> Result<Option<UttaiStatus>, IntakeError> {
        let Some(job_id) = input.job_id else {
            return Ok(None);
        };
        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or(IntakeError::JobNotFound(job_id))?;
        debug!(job_id = %job_id, uttai_status = %job.uttai_status, "Job compliance checked");
        if job.is_blocked() {
            return Err(IntakeError::JobBlocked { job_id });
        }
        Ok(Some(job.uttai_status))
    }

    async fn check_vendor(
        &self,
        input: &CreateIntakeInput,
    ) -> Result<Option<VendorCompliance>, IntakeError> {
        let Some(vendor_id) = input.vendor_id else {
            return Ok(None);
        };
        if input.item_type != IntakeType::VendorInvoice {
            return Ok(None);
        }
        let vendor = self
            .store
            .find_vendor(vendor_id)
            .await?
            .ok_or(IntakeError::VendorNotFound(vendor_id))?;
        debug!(vendor_id = %vendor_id, compliance = %vendor.compliance_status, "Vendor compliance checked");
        if vendor.is_non_compliant() {
            return Err(IntakeError::VendorNonCompliant { vendor_id });
        }
        Ok(Some(vendor.compliance_status))
    }

    /// Advisory check; concurrent submissions can still both pass.
    async fn check_duplicate(
        &self,
        input: &CreateIntakeInput,
        invoice_number: Option<&str>,
    ) -> Result<(), IntakeError> {
        let (IntakeType::VendorInvoice, Some(vendor_id), Some(invoice_number)) =
            (input.item_type, input.vendor_id, invoice_number)
        else {
            return Ok(());
        };
        if let Some(existing) = self
            .store
            .find_duplicate_intake_item(vendor_id, invoice_number, input.amount)
            .await?
        {
            debug!(existing_id = %existing.id, invoice_number, "Duplicate vendor invoice");
            return Err(IntakeError::DuplicateInvoice {
                invoice_number: invoice_number.to_string(),
                existing_id: existing.id,
            });
        }
        Ok(())
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
