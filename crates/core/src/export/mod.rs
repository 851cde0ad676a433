//! Report rows, deduplication and deep links for the spreadsheet exporter.

pub mod dedup;
pub mod link;
pub mod rows;

#[cfg(test)]
mod dedup_props;

pub use dedup::{DedupResult, dedupe_rows, group_key};
pub use link::build_link;
pub use rows::{CollectionsReportRow, IntakeExportRow, intake_rows};
