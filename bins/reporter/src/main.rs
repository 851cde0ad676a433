//! Billtrack collections reporter.
//!
//! Computes the collections snapshot of every issued invoice, collapses rows
//! sharing an accounting number and prints the result as JSON. Rows carry a
//! deep link when `billing.deep_link_template` is configured.
//!
//! Usage:
//!   reporter               - Report as of today (UTC)
//!   reporter 2024-04-14    - Report as of the given date

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billtrack_core::PaymentTerms;
use billtrack_core::export::{CollectionsReportRow, dedupe_rows};
use billtrack_core::store::InvoiceRepository;
use billtrack_db::{PgStore, connect_with};
use billtrack_shared::AppConfig;

#[derive(Debug, Serialize)]
struct Report {
    as_of: NaiveDate,
    rows: Vec<CollectionsReportRow>,
    duplicates_removed: usize,
    duplicate_groups: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billtrack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let as_of = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("invalid report date '{arg}', expected YYYY-MM-DD"))?,
        None => Utc::now().date_naive(),
    };

    let config = AppConfig::load().context("Failed to load configuration")?;
    let terms = PaymentTerms::new(config.billing.default_payment_term_days);
    let link_template = config.billing.deep_link_template.as_deref();

    let db = connect_with(&config.database).await?;
    info!("Connected to database");
    let store = PgStore::new(db);

    let invoices = store.list_issued_invoices().await?;
    let rows = invoices
        .iter()
        .map(|invoice| CollectionsReportRow::from_invoice(invoice, as_of, terms, link_template))
        .collect();
    let result = dedupe_rows(rows);

    if result.duplicates_removed > 0 {
        warn!(
            duplicates_removed = result.duplicates_removed,
            duplicate_groups = result.duplicate_groups,
            "Merged invoices sharing an accounting number"
        );
    }
    info!(invoices = invoices.len(), rows = result.rows.len(), %as_of, "Collections report built");

    let report = Report {
        as_of,
        rows: result.rows,
        duplicates_removed: result.duplicates_removed,
        duplicate_groups: result.duplicate_groups,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
