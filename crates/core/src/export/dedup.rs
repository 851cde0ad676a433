//! Collapses report rows that describe the same accounting invoice.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;

use super::rows::CollectionsReportRow;
use crate::collections::CollectionBucket;

/// Deduplicated rows plus counts for caller-facing warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupResult {
    /// One row per group, in first-seen order.
    pub rows: Vec<CollectionsReportRow>,
    /// Input rows folded into another row.
    pub duplicates_removed: usize,
    /// Groups that had more than one row.
    pub duplicate_groups: usize,
}

/// Grouping key: the accounting number, else the invoice id, trimmed and lowercased.
#[must_use]
pub fn group_key(row: &CollectionsReportRow) -> String {
    match row.sap_invoice_number.as_deref().map(str::trim) {
        Some(number) if !number.is_empty() => number.to_lowercase(),
        _ => row.id.to_string().to_lowercase(),
    }
}

/// Merges rows sharing a [`group_key`]. The first row of a group keeps its
/// identity; amounts and overdue days take the maximum, the due date the
/// earliest, and the bucket prefers `overdue`, then anything over `unknown`.
/// The first present link is kept.
#[must_use]
pub fn dedupe_rows(rows: Vec<CollectionsReportRow>) -> DedupResult {
    let total = rows.len();
    let mut index: HashMap<String, usize> = HashMap::with_capacity(total);
    let mut merged: Vec<CollectionsReportRow> = Vec::with_capacity(total);

    for row in rows {
        let key = group_key(&row);
        if let Some(&at) = index.get(&key) {
            merge_into(&mut merged[at], &row);
        } else {
            index.insert(key, merged.len());
            merged.push(row);
        }
    }

    let duplicate_groups = merged.iter().filter(|r| r.duplicate_count > 1).count();
    DedupResult {
        duplicates_removed: total - merged.len(),
        duplicate_groups,
        rows: merged,
    }
}

fn merge_into(kept: &mut CollectionsReportRow, other: &CollectionsReportRow) {
    kept.duplicate_count += other.duplicate_count;
    kept.amount_due_eur_resolved =
        max_present(kept.amount_due_eur_resolved, other.amount_due_eur_resolved);
    kept.outstanding_eur = max_present(kept.outstanding_eur, other.outstanding_eur);
    kept.days_overdue = kept.days_overdue.max(other.days_overdue);
    kept.bucket = prefer_bucket(kept.bucket, other.bucket);
    kept.due_date_resolved = match (kept.due_date_resolved, other.due_date_resolved) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    if kept.link.is_none() {
        kept.link.clone_from(&other.link);
    }
}

fn max_present(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn prefer_bucket(kept: CollectionBucket, other: CollectionBucket) -> CollectionBucket {
    match bucket_rank(other).cmp(&bucket_rank(kept)) {
        Ordering::Greater => other,
        _ => kept,
    }
}

fn bucket_rank(bucket: CollectionBucket) -> u8 {
    match bucket {
        CollectionBucket::Overdue => 2,
        CollectionBucket::Pending | CollectionBucket::Paid => 1,
        CollectionBucket::Unknown => 0,
    }
}
