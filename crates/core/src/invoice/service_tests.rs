use super::*;
use crate::batch::{BatchAggregator, Decision};
use crate::collections::CollectionBucket;
use crate::compliance::UttaiStatus;
use crate::intake::IntakeType;
use crate::store::{MemoryStore, Table};
use crate::test_support::{FailingDocuments, StubDocuments, intake_item, job, pdf};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

struct Fixture {
    store: Arc<MemoryStore>,
    documents: Arc<StubDocuments>,
    service: InvoiceService<MemoryStore, StubDocuments>,
    batch_id: BatchId,
    billed: Vec<IntakeItemId>,
    discarded: IntakeItemId,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let j = job(UttaiStatus::Clear);
    store.put_job(j.clone()).unwrap();

    let mut fee = intake_item(
        j.id,
        IntakeType::OfficialFee,
        "EUR",
        dec!(50),
        Decimal::ONE,
        IntakeStatus::Posted,
    );
    fee.file_path = Some("intake/u/fee.pdf".to_string());
    fee.invoice_number = Some("TAS-1".to_string());
    let usd = intake_item(
        j.id,
        IntakeType::VendorInvoice,
        "USD",
        dec!(100),
        dec!(0.9),
        IntakeStatus::Posted,
    );
    let dropped = intake_item(
        j.id,
        IntakeType::VendorInvoice,
        "EUR",
        dec!(1000),
        Decimal::ONE,
        IntakeStatus::Posted,
    );
    let ids = vec![fee.id, usd.id, dropped.id];
    for item in [fee, usd, dropped] {
        store.insert_intake_item(item).await.unwrap();
    }

    let aggregator = BatchAggregator::new(Arc::clone(&store));
    let created = aggregator
        .create_batch(j.id, &ids, UserId::new(), None)
        .await
        .unwrap()
        .value;
    aggregator
        .set_decision(created.items[2].id, Some(Decision::Discard))
        .await
        .unwrap();

    let documents = Arc::new(StubDocuments::default());
    Fixture {
        service: InvoiceService::new(
            Arc::clone(&store),
            Arc::clone(&documents),
            CurrencyResolver::default(),
            PaymentTerms::default(),
        ),
        store,
        documents,
        batch_id: created.batch.id,
        billed: ids[..2].to_vec(),
        discarded: ids[2],
    }
}

async fn ready_for_sap(f: &Fixture) -> ClientInvoice {
    let actor = UserId::new();
    let invoice = f
        .service
        .create_invoice_from_batch(f.batch_id, actor, Utc::now())
        .await
        .unwrap()
        .value;
    f.service
        .request_partner_approval(invoice.id, actor)
        .await
        .unwrap();
    f.service.approve_as_partner(invoice.id, actor).await.unwrap()
}

fn register_input(with_pdf: bool) -> RegisterSapInvoiceInput {
    RegisterSapInvoiceInput {
        sap_invoice_number: " 90001234 ".to_string(),
        sap_invoice_date: date(2024, 1, 15),
        pdf: with_pdf.then(pdf),
    }
}

async fn status_of(store: &MemoryStore, id: IntakeItemId) -> IntakeStatus {
    store.find_intake_item(id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn test_create_invoice_from_batch() {
    let f = fixture().await;

    let outcome = f
        .service
        .create_invoice_from_batch(f.batch_id, UserId::new(), Utc::now())
        .await
        .unwrap();

    assert!(outcome.is_clean());
    let invoice = outcome.value;
    assert_eq!(invoice.status, InvoiceStatus::InvoiceDraft);
    assert_eq!(invoice.collection_status, CollectionStatus::Pending);
    let summary = crate::sap::PayloadSummary::from_value(invoice.sap_payload.as_ref());
    assert_eq!(summary.total_amount_eur, Some(dec!(140)));

    let batch = f.store.find_batch(f.batch_id).await.unwrap().unwrap();
    assert_eq!(batch.status, BatchStatus::Invoiced);

    let err = f
        .service
        .create_invoice_from_batch(f.batch_id, UserId::new(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::BatchAlreadyInvoiced(_)));
}

#[tokio::test]
async fn test_batch_with_only_discards_is_empty() {
    let f = fixture().await;
    for item in f.store.list_batch_items(f.batch_id).await.unwrap() {
        let mut item = item;
        item.decision = Some(Decision::Discard);
        f.store.update_batch_item(&item).await.unwrap();
    }

    let err = f
        .service
        .create_invoice_from_batch(f.batch_id, UserId::new(), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::BatchEmpty(_)));
    assert_eq!(f.store.row_count(Table::Invoices), 0);
}

#[tokio::test]
async fn test_batch_update_failure_is_a_warning() {
    let f = fixture().await;
    f.store.fail_writes(Table::Batches);

    let outcome = f
        .service
        .create_invoice_from_batch(f.batch_id, UserId::new(), Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(f.store.row_count(Table::Invoices), 1);
}

#[tokio::test]
async fn test_missing_rate_surfaces_as_warning() {
    let f = fixture().await;
    let batch = f.store.find_batch(f.batch_id).await.unwrap().unwrap();
    let broken = intake_item(
        batch.job_id,
        IntakeType::VendorInvoice,
        "GBP",
        dec!(10),
        Decimal::ZERO,
        IntakeStatus::Posted,
    );
    let broken = f.store.insert_intake_item(broken).await.unwrap();
    f.store
        .insert_batch_items(vec![BillingBatchItem {
            id: billtrack_shared::types::BatchItemId::new(),
            batch_id: f.batch_id,
            intake_item_id: broken.id,
            attach_fee: false,
            decision: None,
        }])
        .await
        .unwrap();

    let outcome = f
        .service
        .create_invoice_from_batch(f.batch_id, UserId::new(), Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("exchange rate"));
}

#[tokio::test]
async fn test_register_without_pdf_fails_without_writes() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;

    let err = f
        .service
        .register_sap_invoice(invoice.id, register_input(false), UserId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::MissingPdf(id) if id == invoice.id));
    assert_eq!(f.service.get(invoice.id).await.unwrap(), invoice);
    assert!(f.documents.uploaded().is_empty());
    assert_eq!(status_of(&f.store, f.billed[0]).await, IntakeStatus::ReadyToBill);
}

#[tokio::test]
async fn test_register_requires_partner_approval() {
    let f = fixture().await;
    let invoice = f
        .service
        .create_invoice_from_batch(f.batch_id, UserId::new(), Utc::now())
        .await
        .unwrap()
        .value;

    let err = f
        .service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvoiceError::InvalidTransition {
            from: InvoiceStatus::InvoiceDraft,
            to: InvoiceStatus::Issued
        }
    ));
    assert!(f.documents.uploaded().is_empty());
}

#[tokio::test]
async fn test_register_sap_invoice_issues_and_bills() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;

    let outcome = f
        .service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap();

    assert!(outcome.is_clean());
    let issued = outcome.value;
    assert_eq!(issued.status, InvoiceStatus::Issued);
    assert_eq!(issued.sap_invoice_number.as_deref(), Some("90001234"));
    assert_eq!(issued.due_date, Some(date(2024, 3, 15)));
    assert_eq!(issued.amount_due_eur, Some(dec!(140)));
    assert_eq!(issued.amount_paid_eur, Decimal::ZERO);
    let pdf_path = issued.pdf_file_path.clone().unwrap();
    assert!(pdf_path.starts_with(&format!("invoices/{}/", invoice.id)));
    assert_eq!(f.documents.uploaded(), vec![pdf_path]);

    for id in &f.billed {
        assert_eq!(status_of(&f.store, *id).await, IntakeStatus::Billed);
    }
    assert_eq!(status_of(&f.store, f.discarded).await, IntakeStatus::ReadyToBill);
}

#[tokio::test]
async fn test_register_reuses_stored_pdf() {
    let f = fixture().await;
    let mut invoice = ready_for_sap(&f).await;
    invoice.pdf_file_path = Some("invoices/manual.pdf".to_string());
    f.store.update_invoice(&invoice).await.unwrap();

    let issued = f
        .service
        .register_sap_invoice(invoice.id, register_input(false), UserId::new())
        .await
        .unwrap()
        .value;

    assert_eq!(issued.pdf_file_path.as_deref(), Some("invoices/manual.pdf"));
    assert!(f.documents.uploaded().is_empty());
}

#[tokio::test]
async fn test_blank_sap_number_refused() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    let mut input = register_input(true);
    input.sap_invoice_number = "   ".to_string();

    let err = f
        .service
        .register_sap_invoice(invoice.id, input, UserId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::SapNumberRequired));
}

#[tokio::test]
async fn test_billed_cascade_failure_is_a_warning() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    f.store.fail_writes(Table::IntakeItems);

    let outcome = f
        .service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap();

    assert_eq!(outcome.value.status, InvoiceStatus::Issued);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("billed"));
    assert_eq!(status_of(&f.store, f.billed[0]).await, IntakeStatus::ReadyToBill);
}

#[tokio::test]
async fn test_invoice_write_failure_is_an_error() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    f.store.fail_writes(Table::Invoices);

    let err = f
        .service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::Store(_)));
    assert_eq!(status_of(&f.store, f.billed[0]).await, IntakeStatus::ReadyToBill);
}

#[tokio::test]
async fn test_upload_failure_blocks_issuing() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    let failing = InvoiceService::new(
        Arc::clone(&f.store),
        Arc::new(FailingDocuments),
        CurrencyResolver::default(),
        PaymentTerms::default(),
    );

    let err = failing
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::Upload(_)));
    assert_eq!(
        f.service.get(invoice.id).await.unwrap().status,
        InvoiceStatus::ReadyForSap
    );
}

#[tokio::test]
async fn test_delivery_archives_items() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    f.service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap();

    let outcome = f
        .service
        .create_delivery(invoice.id, UserId::new())
        .await
        .unwrap();

    assert!(outcome.is_clean());
    assert_eq!(outcome.value.status, InvoiceStatus::Delivered);
    for id in &f.billed {
        assert_eq!(status_of(&f.store, *id).await, IntakeStatus::Archived);
    }
    assert_eq!(status_of(&f.store, f.discarded).await, IntakeStatus::ReadyToBill);
}

#[tokio::test]
async fn test_delivery_requires_issued() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    let err = f
        .service
        .create_delivery(invoice.id, UserId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_mark_as_paid_keeps_status() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    f.service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap();

    let paid = f
        .service
        .mark_as_paid(invoice.id, UserId::new())
        .await
        .unwrap();

    assert_eq!(paid.status, InvoiceStatus::Issued);
    assert_eq!(paid.collection_status, CollectionStatus::Paid);
    assert_eq!(paid.amount_paid_eur, dec!(140));
    assert!(paid.paid_at.is_some());

    let snapshot = f.service.snapshot(invoice.id, date(2030, 1, 1)).await.unwrap();
    assert_eq!(snapshot.bucket, CollectionBucket::Paid);
    assert_eq!(snapshot.outstanding_eur, Some(Decimal::ZERO));
}

#[tokio::test]
async fn test_snapshot_overdue_after_term() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;
    f.service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap();

    let before = f.service.snapshot(invoice.id, date(2024, 3, 1)).await.unwrap();
    assert_eq!(before.bucket, CollectionBucket::Pending);

    let after = f.service.snapshot(invoice.id, date(2024, 4, 14)).await.unwrap();
    assert_eq!(after.bucket, CollectionBucket::Overdue);
    assert_eq!(after.days_overdue, 30);
    assert_eq!(after.outstanding_eur, Some(dec!(140)));
}

#[tokio::test]
async fn test_invoice_pdf_url() {
    let f = fixture().await;
    let invoice = ready_for_sap(&f).await;

    let err = f
        .service
        .invoice_pdf_url(invoice.id, Duration::from_secs(300))
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::MissingPdf(_)));

    let issued = f
        .service
        .register_sap_invoice(invoice.id, register_input(true), UserId::new())
        .await
        .unwrap()
        .value;
    let url = f
        .service
        .invoice_pdf_url(invoice.id, Duration::from_secs(300))
        .await
        .unwrap();
    assert!(url.contains(issued.pdf_file_path.as_deref().unwrap()));
    assert!(url.ends_with("expires=300"));
}
