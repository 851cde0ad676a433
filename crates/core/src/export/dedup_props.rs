//! Property-based tests for report deduplication.

use std::collections::HashSet;

use billtrack_shared::types::InvoiceId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::dedup::{dedupe_rows, group_key};
use super::rows::CollectionsReportRow;
use crate::collections::CollectionBucket;

fn bucket() -> impl Strategy<Value = CollectionBucket> {
    prop_oneof![
        Just(CollectionBucket::Pending),
        Just(CollectionBucket::Overdue),
        Just(CollectionBucket::Paid),
        Just(CollectionBucket::Unknown),
    ]
}

fn report_row() -> impl Strategy<Value = CollectionsReportRow> {
    (
        proptest::option::of(prop_oneof![Just("F-1"), Just("f-1 "), Just("F-2"), Just("")]),
        proptest::option::of((0i64..1_000_000).prop_map(|c| Decimal::new(c, 2))),
        bucket(),
        0i64..400,
    )
        .prop_map(|(number, due, bucket, days_overdue)| CollectionsReportRow {
            id: InvoiceId::new(),
            sap_invoice_number: number.map(str::to_string),
            amount_due_eur_resolved: due,
            outstanding_eur: due,
            bucket,
            days_overdue,
            due_date_resolved: None,
            link: None,
            duplicate_count: 1,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every input row is accounted for exactly once.
    #[test]
    fn prop_counts_are_conserved(rows in proptest::collection::vec(report_row(), 0..20)) {
        let total = rows.len();
        let result = dedupe_rows(rows);

        let merged: u32 = result.rows.iter().map(|r| r.duplicate_count).sum();
        prop_assert_eq!(merged as usize, total);
        prop_assert_eq!(result.rows.len() + result.duplicates_removed, total);
        prop_assert!(result.duplicate_groups <= result.rows.len());
    }

    /// Output keys are unique.
    #[test]
    fn prop_keys_unique(rows in proptest::collection::vec(report_row(), 0..20)) {
        let result = dedupe_rows(rows);
        let keys: HashSet<String> = result.rows.iter().map(group_key).collect();
        prop_assert_eq!(keys.len(), result.rows.len());
    }

    /// Running it again changes nothing.
    #[test]
    fn prop_idempotent(rows in proptest::collection::vec(report_row(), 0..20)) {
        let once = dedupe_rows(rows);
        let twice = dedupe_rows(once.rows.clone());
        prop_assert_eq!(twice.duplicates_removed, 0);
        prop_assert_eq!(twice.rows, once.rows);
    }

    /// A group with any overdue row is overdue.
    #[test]
    fn prop_overdue_wins(rows in proptest::collection::vec(report_row(), 1..20)) {
        let result = dedupe_rows(rows.clone());
        for merged in &result.rows {
            let key = group_key(merged);
            let any_overdue = rows
                .iter()
                .filter(|r| group_key(r) == key)
                .any(|r| r.bucket == CollectionBucket::Overdue);
            prop_assert_eq!(merged.bucket == CollectionBucket::Overdue, any_overdue);
        }
    }
}
