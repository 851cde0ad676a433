//! Property-based tests for collection snapshots.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::snapshot::{
    CollectionBucket, CollectionFields, CollectionSnapshot, CollectionStatus, PaymentTerms,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A persisted `paid` status always yields bucket `paid` with nothing outstanding.
    #[test]
    fn prop_paid_status_always_paid(
        due in proptest::option::of(amount()),
        paid in amount(),
        due_offset in 0u64..400,
        today_offset in 0u64..800,
    ) {
        let fields = CollectionFields {
            collection_status: CollectionStatus::Paid,
            amount_paid_eur: paid,
            amount_due_eur: due,
            sap_payload: None,
            due_date: base_date().checked_add_days(Days::new(due_offset)),
            sap_invoice_date: None,
        };
        let today = base_date().checked_add_days(Days::new(today_offset)).unwrap();
        let snap = CollectionSnapshot::compute(&fields, today, PaymentTerms::default());
        prop_assert_eq!(snap.bucket, CollectionBucket::Paid);
        prop_assert_eq!(snap.outstanding_eur, Some(Decimal::ZERO));
        prop_assert_eq!(snap.days_overdue, 0);
    }

    /// Outstanding is never negative and never exceeds the amount due.
    #[test]
    fn prop_outstanding_bounded(due in amount(), paid in amount()) {
        let fields = CollectionFields {
            collection_status: CollectionStatus::Pending,
            amount_paid_eur: paid,
            amount_due_eur: Some(due),
            sap_payload: None,
            due_date: None,
            sap_invoice_date: None,
        };
        let snap = CollectionSnapshot::compute(&fields, base_date(), PaymentTerms::default());
        let outstanding = snap.outstanding_eur.unwrap();
        prop_assert!(outstanding >= Decimal::ZERO);
        prop_assert!(outstanding <= due);
    }

    /// Days overdue equals the calendar distance past the due date.
    #[test]
    fn prop_days_overdue_matches_calendar(gap in 0u64..1000) {
        let today = base_date().checked_add_days(Days::new(gap)).unwrap();
        let fields = CollectionFields {
            collection_status: CollectionStatus::Pending,
            amount_paid_eur: Decimal::ZERO,
            amount_due_eur: Some(Decimal::ONE_HUNDRED),
            sap_payload: None,
            due_date: Some(base_date()),
            sap_invoice_date: None,
        };
        let snap = CollectionSnapshot::compute(&fields, today, PaymentTerms::default());
        prop_assert_eq!(snap.days_overdue, i64::try_from(gap).unwrap());
        let expected = if gap > 0 { CollectionBucket::Overdue } else { CollectionBucket::Pending };
        prop_assert_eq!(snap.bucket, expected);
    }
}
