//! Property-based tests for currency resolution.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::CurrencyError;
use super::resolution::{CurrencyResolver, round_money, round_rate};

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates with up to 8 decimals.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000_000i64).prop_map(|v| Decimal::new(v, 8))
}

/// Strategy to generate supplied rates that can never be used.
fn unusable_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        Just(Some(Decimal::ZERO)),
        (1i64..1_000_000i64).prop_map(|v| Some(Decimal::new(-v, 4))),
    ]
}

fn foreign_currency() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("USD"), Just("gbp"), Just("JPY"), Just("chf")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Reporting currency always resolves to rate 1 and the rounded amount,
    /// whatever rate was supplied.
    #[test]
    fn prop_reporting_currency_rate_is_one(
        amount in positive_amount(),
        rate in proptest::option::of(positive_rate()),
        currency in prop_oneof![Just("EUR"), Just("eur"), Just("Eur")],
    ) {
        let fx = CurrencyResolver::default().resolve(currency, amount, rate).unwrap();
        prop_assert_eq!(fx.exchange_rate_to_eur, Decimal::ONE);
        prop_assert_eq!(fx.amount_eur, round_money(amount));
    }

    /// Foreign currency converts with the rate rounded to 6 decimals.
    #[test]
    fn prop_foreign_amount_uses_rounded_rate(
        amount in positive_amount(),
        rate in positive_rate(),
        currency in foreign_currency(),
    ) {
        let fx = CurrencyResolver::default().resolve(currency, amount, Some(rate)).unwrap();
        prop_assert_eq!(fx.exchange_rate_to_eur, round_rate(rate));
        prop_assert_eq!(fx.amount_eur, round_money(amount * round_rate(rate)));
    }

    /// Absent, zero, or negative rates always fail for foreign currencies.
    #[test]
    fn prop_unusable_rate_fails(
        amount in positive_amount(),
        rate in unusable_rate(),
        currency in foreign_currency(),
    ) {
        let result = CurrencyResolver::default().resolve(currency, amount, rate);
        let is_missing_rate = matches!(result, Err(CurrencyError::MissingRate { .. }));
        prop_assert!(is_missing_rate);
    }

    /// Resolution is deterministic.
    #[test]
    fn prop_resolution_is_deterministic(
        amount in positive_amount(),
        rate in positive_rate(),
        currency in foreign_currency(),
    ) {
        let resolver = CurrencyResolver::default();
        prop_assert_eq!(
            resolver.resolve(currency, amount, Some(rate)),
            resolver.resolve(currency, amount, Some(rate))
        );
    }
}
