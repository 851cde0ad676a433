//! Dunning claims raised against unpaid client invoices.

use std::collections::HashSet;
use std::sync::Arc;

use billtrack_shared::types::{ClaimId, InvoiceId, UserId};
use chrono::Utc;
use tracing::{debug, info};
use validator::ValidateEmail;

use super::error::ClaimError;
use super::types::{ClaimStatus, CollectionClaim, CreateClaimInput};
use crate::collections::{CollectionBucket, CollectionSnapshot, PaymentTerms};
use crate::store::{CollectionClaimRepository, InvoiceRepository};

/// Drafts, reviews and sends collection claims.
pub struct ClaimService<S> {
    store: Arc<S>,
    terms: PaymentTerms,
}

impl<S> ClaimService<S>
where
    S: CollectionClaimRepository + InvoiceRepository,
{
    /// Create a new claim service.
    #[must_use]
    pub fn new(store: Arc<S>, terms: PaymentTerms) -> Self {
        Self { store, terms }
    }

    /// Drafts a claim in `pending_approval`.
    pub async fn create_claim(
        &self,
        invoice_id: InvoiceId,
        input: CreateClaimInput,
        actor: UserId,
    ) -> Result<CollectionClaim, ClaimError> {
        let to = normalize_recipients(&input.to)?;
        if to.is_empty() {
            return Err(ClaimError::NoRecipients);
        }
        let cc = normalize_recipients(&input.cc)?;
        let responsible = normalize_recipients(&input.responsible)?;

        let invoice = self
            .store
            .find_invoice(invoice_id)
            .await?
            .ok_or(ClaimError::InvoiceNotFound(invoice_id))?;
        let snapshot = CollectionSnapshot::compute_now(&invoice.collection_fields(), self.terms);
        debug!(invoice_id = %invoice_id, bucket = snapshot.bucket.as_str(), "Claim bucket check");
        if snapshot.bucket == CollectionBucket::Paid {
            return Err(ClaimError::InvoicePaid(invoice_id));
        }

        let now = Utc::now();
        let claim = self
            .store
            .insert_claim(CollectionClaim {
                id: ClaimId::new(),
                invoice_id,
                to_recipients: to,
                cc_recipients: cc,
                responsible_recipients: responsible,
                body: input.body,
                status: ClaimStatus::PendingApproval,
                rejection_reason: None,
                created_by: actor,
                reviewed_by: None,
                sent_at: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(claim_id = %claim.id, invoice_id = %invoice_id, actor = %actor, "Collection claim drafted");
        Ok(claim)
    }

    /// PendingApproval → Approved.
    pub async fn approve(&self, id: ClaimId, actor: UserId) -> Result<CollectionClaim, ClaimError> {
        let mut claim = self.get(id).await?;
        check(claim.status, ClaimStatus::PendingApproval, ClaimStatus::Approved)?;
        claim.status = ClaimStatus::Approved;
        claim.reviewed_by = Some(actor);
        self.save(claim, actor).await
    }

    /// PendingApproval → Rejected, recording the reason.
    pub async fn reject(
        &self,
        id: ClaimId,
        reason: &str,
        actor: UserId,
    ) -> Result<CollectionClaim, ClaimError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClaimError::RejectionReasonRequired);
        }
        let mut claim = self.get(id).await?;
        check(claim.status, ClaimStatus::PendingApproval, ClaimStatus::Rejected)?;
        claim.status = ClaimStatus::Rejected;
        claim.rejection_reason = Some(reason.to_string());
        claim.reviewed_by = Some(actor);
        self.save(claim, actor).await
    }

    /// Approved → Sent.
    pub async fn mark_sent(&self, id: ClaimId, actor: UserId) -> Result<CollectionClaim, ClaimError> {
        let mut claim = self.get(id).await?;
        check(claim.status, ClaimStatus::Approved, ClaimStatus::Sent)?;
        claim.status = ClaimStatus::Sent;
        claim.sent_at = Some(Utc::now());
        self.save(claim, actor).await
    }

    /// Lists the claims of an invoice, oldest first.
    pub async fn list(&self, invoice_id: InvoiceId) -> Result<Vec<CollectionClaim>, ClaimError> {
        Ok(self.store.list_claims(invoice_id).await?)
    }

    async fn get(&self, id: ClaimId) -> Result<CollectionClaim, ClaimError> {
        self.store
            .find_claim(id)
            .await?
            .ok_or(ClaimError::NotFound(id))
    }

    async fn save(&self, mut claim: CollectionClaim, actor: UserId) -> Result<CollectionClaim, ClaimError> {
        claim.updated_at = Utc::now();
        let claim = self.store.update_claim(&claim).await?;
        info!(claim_id = %claim.id, actor = %actor, status = %claim.status, "Collection claim updated");
        Ok(claim)
    }
}

fn check(current: ClaimStatus, expected: ClaimStatus, next: ClaimStatus) -> Result<(), ClaimError> {
    if current == expected {
        Ok(())
    } else {
        Err(ClaimError::InvalidTransition {
            from: current,
            to: next,
        })
    }
}

/// Trims, lowercases and deduplicates addresses, keeping first-seen order.
/// Blank entries are dropped.
pub fn normalize_recipients(raw: &[String]) -> Result<Vec<String>, ClaimError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for address in raw {
        let address = address.trim().to_lowercase();
        if address.is_empty() {
            continue;
        }
        if !address.validate_email() {
            return Err(ClaimError::InvalidRecipient(address));
        }
        if seen.insert(address.clone()) {
            out.push(address);
        }
    }
    Ok(out)
}
