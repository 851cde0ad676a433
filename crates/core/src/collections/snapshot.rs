//! Collection snapshot derivation.

use std::fmt;

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::round_money;
use crate::sap::PayloadSummary;

/// Persisted collections axis of a client invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    /// Not yet collected.
    Pending,
    /// Collected in full.
    Paid,
}

impl CollectionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Derived collections classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionBucket {
    /// Outstanding, not yet due.
    Pending,
    /// Outstanding and past due.
    Overdue,
    /// Nothing outstanding.
    Paid,
    /// Not enough data to classify.
    Unknown,
}

impl CollectionBucket {
    /// Returns the string representation of the bucket.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CollectionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment terms used when an invoice carries no explicit due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTerms {
    /// Calendar days from the accounting invoice date.
    pub default_days: u64,
}

impl PaymentTerms {
    /// Default term: 60 calendar days.
    pub const DEFAULT_DAYS: u64 = 60;

    /// Creates payment terms; negative day counts clamp to zero.
    #[must_use]
    pub fn new(default_days: i64) -> Self {
        Self {
            default_days: u64::try_from(default_days).unwrap_or(0),
        }
    }

    /// Resolves the due date: explicit date first, else invoice date plus the term.
    #[must_use]
    pub fn resolve_due_date(
        &self,
        due_date: Option<NaiveDate>,
        sap_invoice_date: Option<NaiveDate>,
    ) -> Option<NaiveDate> {
        due_date.or_else(|| {
            sap_invoice_date.and_then(|date| date.checked_add_days(Days::new(self.default_days)))
        })
    }
}

impl Default for PaymentTerms {
    fn default() -> Self {
        Self {
            default_days: Self::DEFAULT_DAYS,
        }
    }
}

/// Invoice fields a snapshot is computed from.
#[derive(Debug, Clone, Copy)]
pub struct CollectionFields<'a> {
    /// Persisted collections axis.
    pub collection_status: CollectionStatus,
    /// Amount collected.
    pub amount_paid_eur: Decimal,
    /// Amount due, if recorded.
    pub amount_due_eur: Option<Decimal>,
    /// Audit payload, used as a fallback for the amount due.
    pub sap_payload: Option<&'a serde_json::Value>,
    /// Explicit due date.
    pub due_date: Option<NaiveDate>,
    /// Accounting invoice date.
    pub sap_invoice_date: Option<NaiveDate>,
}

/// Collections view of one invoice at a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Resolved due date.
    pub due_date: Option<NaiveDate>,
    /// Resolved amount due.
    pub amount_due_eur: Option<Decimal>,
    /// Amount collected.
    pub amount_paid_eur: Decimal,
    /// Amount still outstanding; `None` when the amount due is unknown.
    pub outstanding_eur: Option<Decimal>,
    /// Classification.
    pub bucket: CollectionBucket,
    /// Calendar days past the due date (0 if not past due).
    pub days_overdue: i64,
}

impl CollectionSnapshot {
    /// Computes the snapshot as of `today`.
    ///
    /// # Bucket priority
    ///
    /// 1. persisted status `paid` → `paid` (outstanding and days overdue forced to 0)
    /// 2. unknown amount due → `overdue` if past due, else `unknown`
    /// 3. nothing outstanding → `paid`
    /// 4. `overdue` if past due, else `pending`
    #[must_use]
    pub fn compute(fields: &CollectionFields<'_>, today: NaiveDate, terms: PaymentTerms) -> Self {
        let due_date = terms.resolve_due_date(fields.due_date, fields.sap_invoice_date);
        let amount_due_eur = fields
            .amount_due_eur
            .or_else(|| PayloadSummary::from_value(fields.sap_payload).total_amount_eur);
        let outstanding_eur =
            amount_due_eur.map(|due| round_money((due - fields.amount_paid_eur).max(Decimal::ZERO)));
        let days_overdue = due_date.map_or(0, |due| (today - due).num_days().max(0));

        if fields.collection_status == CollectionStatus::Paid {
            return Self {
                due_date,
                amount_due_eur,
                amount_paid_eur: fields.amount_paid_eur,
                outstanding_eur: Some(Decimal::ZERO),
                bucket: CollectionBucket::Paid,
                days_overdue: 0,
            };
        }

        let bucket = match outstanding_eur {
            None if days_overdue > 0 => CollectionBucket::Overdue,
            None => CollectionBucket::Unknown,
            Some(outstanding) if outstanding <= Decimal::ZERO => CollectionBucket::Paid,
            Some(_) if days_overdue > 0 => CollectionBucket::Overdue,
            Some(_) => CollectionBucket::Pending,
        };

        Self {
            due_date,
            amount_due_eur,
            amount_paid_eur: fields.amount_paid_eur,
            outstanding_eur,
            bucket,
            days_overdue,
        }
    }

    /// Computes the snapshot as of the current UTC date.
    #[must_use]
    pub fn compute_now(fields: &CollectionFields<'_>, terms: PaymentTerms) -> Self {
        Self::compute(fields, Utc::now().date_naive(), terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fields() -> CollectionFields<'static> {
        CollectionFields {
            collection_status: CollectionStatus::Pending,
            amount_paid_eur: Decimal::ZERO,
            amount_due_eur: Some(dec!(100)),
            sap_payload: None,
            due_date: None,
            sap_invoice_date: None,
        }
    }

    #[test]
    fn test_overdue_after_sixty_days() {
        let f = CollectionFields {
            due_date: Some(date(2024, 1, 1)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 3, 1), PaymentTerms::default());
        assert_eq!(snap.days_overdue, 60);
        assert_eq!(snap.bucket, CollectionBucket::Overdue);
        assert_eq!(snap.outstanding_eur, Some(dec!(100)));
    }

    #[test]
    fn test_paid_status_overrides_everything() {
        let f = CollectionFields {
            collection_status: CollectionStatus::Paid,
            amount_paid_eur: Decimal::ZERO,
            due_date: Some(date(2023, 1, 1)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 3, 1), PaymentTerms::default());
        assert_eq!(snap.bucket, CollectionBucket::Paid);
        assert_eq!(snap.outstanding_eur, Some(Decimal::ZERO));
        assert_eq!(snap.days_overdue, 0);
    }

    #[test]
    fn test_due_date_from_invoice_date_and_term() {
        let f = CollectionFields {
            sap_invoice_date: Some(date(2024, 1, 10)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 2, 1), PaymentTerms::default());
        assert_eq!(snap.due_date, Some(date(2024, 3, 10)));
        assert_eq!(snap.bucket, CollectionBucket::Pending);
        assert_eq!(snap.days_overdue, 0);

        let short = CollectionSnapshot::compute(&f, date(2024, 2, 1), PaymentTerms::new(15));
        assert_eq!(short.due_date, Some(date(2024, 1, 25)));
        assert_eq!(short.days_overdue, 7);
        assert_eq!(short.bucket, CollectionBucket::Overdue);
    }

    #[test]
    fn test_explicit_due_date_wins_over_term() {
        let f = CollectionFields {
            due_date: Some(date(2024, 5, 1)),
            sap_invoice_date: Some(date(2024, 1, 1)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 4, 1), PaymentTerms::default());
        assert_eq!(snap.due_date, Some(date(2024, 5, 1)));
        assert_eq!(snap.bucket, CollectionBucket::Pending);
    }

    #[test]
    fn test_amount_due_falls_back_to_payload_total() {
        let payload = json!({"fx_audit": {"total_amount_eur": "80.50", "missing_rates_count": 0}});
        let f = CollectionFields {
            amount_due_eur: None,
            amount_paid_eur: dec!(30),
            sap_payload: Some(&payload),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 1, 1), PaymentTerms::default());
        assert_eq!(snap.amount_due_eur, Some(dec!(80.50)));
        assert_eq!(snap.outstanding_eur, Some(dec!(50.50)));
        assert_eq!(snap.bucket, CollectionBucket::Pending);
    }

    #[test]
    fn test_unknown_amount_without_due_date_is_unknown() {
        let f = CollectionFields {
            amount_due_eur: None,
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 1, 1), PaymentTerms::default());
        assert_eq!(snap.outstanding_eur, None);
        assert_eq!(snap.bucket, CollectionBucket::Unknown);
    }

    #[test]
    fn test_unknown_amount_past_due_is_overdue() {
        let f = CollectionFields {
            amount_due_eur: None,
            due_date: Some(date(2023, 12, 1)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 1, 1), PaymentTerms::default());
        assert_eq!(snap.outstanding_eur, None);
        assert_eq!(snap.bucket, CollectionBucket::Overdue);
        assert_eq!(snap.days_overdue, 31);
    }

    #[test]
    fn test_fully_collected_without_paid_flag_is_paid() {
        let f = CollectionFields {
            amount_paid_eur: dec!(120),
            due_date: Some(date(2023, 12, 1)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 1, 1), PaymentTerms::default());
        assert_eq!(snap.outstanding_eur, Some(Decimal::ZERO));
        assert_eq!(snap.bucket, CollectionBucket::Paid);
        assert_eq!(snap.days_overdue, 31);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let f = CollectionFields {
            due_date: Some(date(2024, 1, 1)),
            ..fields()
        };
        let snap = CollectionSnapshot::compute(&f, date(2024, 1, 1), PaymentTerms::default());
        assert_eq!(snap.days_overdue, 0);
        assert_eq!(snap.bucket, CollectionBucket::Pending);
    }
}
