//! Flat report rows consumed by the spreadsheet exporter.

use std::collections::HashMap;

use billtrack_shared::types::{IntakeItemId, InvoiceId, JobId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::link::build_link;
use crate::collections::{CollectionBucket, CollectionSnapshot, PaymentTerms};
use crate::compliance::Job;
use crate::intake::IntakeItem;
use crate::invoice::ClientInvoice;

/// One invoice joined with its collections snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionsReportRow {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Accounting invoice number.
    pub sap_invoice_number: Option<String>,
    /// Amount due after the payload fallback.
    pub amount_due_eur_resolved: Option<Decimal>,
    /// Amount still owed.
    pub outstanding_eur: Option<Decimal>,
    /// Collections bucket.
    pub bucket: CollectionBucket,
    /// Days past the resolved due date.
    pub days_overdue: i64,
    /// Due date after the payment-term fallback.
    pub due_date_resolved: Option<NaiveDate>,
    /// Deep link built from the accounting number.
    pub link: Option<String>,
    /// Number of source rows merged into this one.
    pub duplicate_count: u32,
}

impl CollectionsReportRow {
    /// Builds the row for `invoice` as of `today`.
    #[must_use]
    pub fn from_invoice(
        invoice: &ClientInvoice,
        today: NaiveDate,
        terms: PaymentTerms,
        link_template: Option<&str>,
    ) -> Self {
        let snapshot = CollectionSnapshot::compute(&invoice.collection_fields(), today, terms);
        let link = match (invoice.sap_invoice_number.as_deref(), link_template) {
            (Some(number), Some(template)) => build_link(number, template),
            _ => None,
        };
        Self {
            id: invoice.id,
            sap_invoice_number: invoice.sap_invoice_number.clone(),
            amount_due_eur_resolved: snapshot.amount_due_eur,
            outstanding_eur: snapshot.outstanding_eur,
            bucket: snapshot.bucket,
            days_overdue: snapshot.days_overdue,
            due_date_resolved: snapshot.due_date,
            link,
            duplicate_count: 1,
        }
    }
}

/// One intake item joined with its job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeExportRow {
    /// Item ID.
    pub id: IntakeItemId,
    /// Human-readable document kind.
    pub type_label: &'static str,
    /// Vendor invoice or receipt number.
    pub reference: Option<String>,
    /// Deep link built from the reference.
    pub link: Option<String>,
    /// Job code.
    pub job_code: Option<String>,
    /// Client name.
    pub client_name: Option<String>,
    /// Client country.
    pub client_country: Option<String>,
    /// Amount in the original currency.
    pub amount: Decimal,
    /// Rate applied at creation.
    pub exchange_rate: Decimal,
    /// Amount in the reporting currency.
    pub amount_eur: Decimal,
    /// Original currency.
    pub currency: String,
    /// Free-text concept.
    pub concept: Option<String>,
    /// Fee organism.
    pub organism: Option<String>,
    /// Fee tariff.
    pub tariff: Option<String>,
    /// Human-readable status.
    pub status_label: &'static str,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl IntakeExportRow {
    /// Flattens an item and its job. Job columns are empty when the job is unknown.
    #[must_use]
    pub fn new(item: &IntakeItem, job: Option<&Job>, link_template: Option<&str>) -> Self {
        let link = match (item.invoice_number.as_deref(), link_template) {
            (Some(reference), Some(template)) => build_link(reference, template),
            _ => None,
        };
        Self {
            id: item.id,
            type_label: item.item_type.label(),
            reference: item.invoice_number.clone(),
            link,
            job_code: job.map(|j| j.code.clone()),
            client_name: job.map(|j| j.client_name.clone()),
            client_country: job.and_then(|j| j.client_country.clone()),
            amount: item.amount,
            exchange_rate: item.exchange_rate_to_eur,
            amount_eur: item.amount_eur,
            currency: item.currency.clone(),
            concept: item.concept.clone(),
            organism: item.organism.clone(),
            tariff: item.tariff.clone(),
            status_label: item.status.label(),
            created_at: item.created_at,
        }
    }
}

/// Joins items with jobs in memory, keeping item order.
#[must_use]
pub fn intake_rows(
    items: &[IntakeItem],
    jobs: &[Job],
    link_template: Option<&str>,
) -> Vec<IntakeExportRow> {
    let jobs: HashMap<JobId, &Job> = jobs.iter().map(|j| (j.id, j)).collect();
    items
        .iter()
        .map(|item| {
            let job = item.job_id.and_then(|id| jobs.get(&id).copied());
            IntakeExportRow::new(item, job, link_template)
        })
        .collect()
}
