//! Fixtures shared by the service tests.

use std::sync::Mutex;
use std::time::Duration;

use billtrack_shared::types::{BatchId, IntakeItemId, InvoiceId, JobId, UserId, VendorId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::collections::CollectionStatus;
use crate::compliance::{Job, UttaiStatus, Vendor, VendorCompliance};
use crate::currency::round_money;
use crate::intake::{IntakeItem, IntakeStatus, IntakeType};
use crate::invoice::{ClientInvoice, InvoiceStatus};
use crate::storage::{DocumentStore, StorageError, UploadFile};

pub(crate) fn job(uttai_status: UttaiStatus) -> Job {
    Job {
        id: JobId::new(),
        code: "J-2024-001".to_string(),
        client_name: "Acme Iberia".to_string(),
        client_country: Some("ES".to_string()),
        uttai_status,
    }
}

pub(crate) fn vendor(compliance_status: VendorCompliance) -> Vendor {
    Vendor {
        id: VendorId::new(),
        name: "Notaría Central".to_string(),
        compliance_status,
    }
}

pub(crate) fn intake_item(
    job_id: JobId,
    item_type: IntakeType,
    currency: &str,
    amount: Decimal,
    rate: Decimal,
    status: IntakeStatus,
) -> IntakeItem {
    let now = Utc::now();
    IntakeItem {
        id: IntakeItemId::new(),
        item_type,
        job_id: Some(job_id),
        vendor_id: None,
        invoice_number: None,
        concept: Some("Registry filing".to_string()),
        organism: None,
        tariff: None,
        currency: currency.to_string(),
        amount,
        exchange_rate_to_eur: rate,
        amount_eur: round_money(amount * rate),
        status,
        file_path: None,
        uttai_status_snapshot: Some(UttaiStatus::Clear),
        vendor_compliance_snapshot: None,
        rejection_reason: None,
        created_by: UserId::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Registered invoice of 1000.00 due 2024-03-15.
pub(crate) fn invoice(status: InvoiceStatus) -> ClientInvoice {
    let now = Utc::now();
    ClientInvoice {
        id: InvoiceId::new(),
        batch_id: BatchId::new(),
        status,
        sap_invoice_number: Some("90001".to_string()),
        sap_invoice_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        pdf_file_path: Some("invoices/90001.pdf".to_string()),
        sap_payload: None,
        due_date: NaiveDate::from_ymd_opt(2024, 3, 15),
        amount_due_eur: Some(Decimal::new(100_000, 2)),
        collection_status: CollectionStatus::Pending,
        amount_paid_eur: Decimal::ZERO,
        paid_at: None,
        created_by: UserId::new(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn pdf() -> UploadFile {
    UploadFile::new("invoice.pdf", "application/pdf", b"%PDF-1.7".to_vec())
}

/// Document store that records uploads and signs any path.
#[derive(Debug, Default)]
pub(crate) struct StubDocuments {
    pub(crate) uploads: Mutex<Vec<String>>,
}

impl StubDocuments {
    pub(crate) fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

impl DocumentStore for StubDocuments {
    async fn upload(&self, path: &str, _file: &UploadFile) -> Result<String, StorageError> {
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(path.to_string())
    }

    async fn signed_url(&self, path: &str, expiry: Duration) -> Result<String, StorageError> {
        Ok(format!(
            "https://docs.example.test/{path}?expires={}",
            expiry.as_secs()
        ))
    }
}

/// Document store whose every call fails.
#[derive(Debug, Default)]
pub(crate) struct FailingDocuments;

impl DocumentStore for FailingDocuments {
    async fn upload(&self, _path: &str, _file: &UploadFile) -> Result<String, StorageError> {
        Err(StorageError::Operation("bucket unreachable".to_string()))
    }

    async fn signed_url(&self, _path: &str, _expiry: Duration) -> Result<String, StorageError> {
        Err(StorageError::Operation("bucket unreachable".to_string()))
    }
}
