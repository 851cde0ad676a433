//! Currency resolution into the reporting currency.
//!
//! CRITICAL: Rounding strategy:
//! - Half away from zero (not banker's rounding)
//! - Rates are kept to 6 decimal places, reporting amounts to 2
//! - The converted amount is computed from the *rounded* rate, so
//!   `amount_eur == round(amount * exchange_rate_to_eur, 2)` holds for every
//!   stored record

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// Decimal places kept for reporting-currency amounts.
pub const MONEY_DECIMALS: u32 = 2;

/// Decimal places kept for exchange rates.
pub const RATE_DECIMALS: u32 = 6;

/// Rounds half away from zero at the given decimal count.
#[must_use]
pub fn round_half_away(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a reporting-currency amount to 2 decimals.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    round_half_away(value, MONEY_DECIMALS)
}

/// Rounds an exchange rate to 6 decimals.
#[must_use]
pub fn round_rate(value: Decimal) -> Decimal {
    round_half_away(value, RATE_DECIMALS)
}

/// Result of resolving an amount into the reporting currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxResolution {
    /// Rate applied (1 unit of source currency = rate units of reporting currency).
    pub exchange_rate_to_eur: Decimal,
    /// Converted amount in the reporting currency.
    pub amount_eur: Decimal,
}

/// Resolves amounts into the configured reporting currency.
///
/// Pure and deterministic: the same inputs always yield the same output and
/// no external state is consulted.
#[derive(Debug, Clone)]
pub struct CurrencyResolver {
    reporting_currency: String,
}

impl CurrencyResolver {
    /// Creates a resolver for the given reporting currency (ISO 4217 code).
    #[must_use]
    pub fn new(reporting_currency: impl Into<String>) -> Self {
        Self {
            reporting_currency: reporting_currency.into().trim().to_uppercase(),
        }
    }

    /// Returns the reporting currency code.
    #[must_use]
    pub fn reporting_currency(&self) -> &str {
        &self.reporting_currency
    }

    /// Returns true if `currency` is the reporting currency (case-insensitive).
    #[must_use]
    pub fn is_reporting_currency(&self, currency: &str) -> bool {
        currency.trim().eq_ignore_ascii_case(&self.reporting_currency)
    }

    /// Resolves `amount` in `currency` into the reporting currency.
    ///
    /// # Rules
    ///
    /// - `amount` must be strictly positive
    /// - reporting currency: rate is exactly 1 and any supplied rate is ignored
    /// - any other currency: a strictly positive rate is required
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use billtrack_core::currency::CurrencyResolver;
    ///
    /// let resolver = CurrencyResolver::new("EUR");
    /// let fx = resolver.resolve("usd", dec!(100), Some(dec!(0.9234567))).unwrap();
    /// assert_eq!(fx.exchange_rate_to_eur, dec!(0.923457));
    /// assert_eq!(fx.amount_eur, dec!(92.35));
    /// ```
    pub fn resolve(
        &self,
        currency: &str,
        amount: Decimal,
        exchange_rate_to_eur: Option<Decimal>,
    ) -> Result<FxResolution, CurrencyError> {
        if amount <= Decimal::ZERO {
            return Err(CurrencyError::InvalidAmount { amount });
        }

        if self.is_reporting_currency(currency) {
            return Ok(FxResolution {
                exchange_rate_to_eur: Decimal::ONE,
                amount_eur: round_money(amount),
            });
        }

        let rate = exchange_rate_to_eur
            .filter(|rate| *rate > Decimal::ZERO)
            .map(round_rate)
            .filter(|rate| *rate > Decimal::ZERO)
            .ok_or_else(|| CurrencyError::MissingRate {
                currency: currency.trim().to_uppercase(),
                reporting: self.reporting_currency.clone(),
            })?;

        let converted = amount
            .checked_mul(rate)
            .ok_or(CurrencyError::InvalidAmount { amount })?;

        Ok(FxResolution {
            exchange_rate_to_eur: rate,
            amount_eur: round_money(converted),
        })
    }
}

impl Default for CurrencyResolver {
    fn default() -> Self {
        Self::new("EUR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reporting_currency_ignores_supplied_rate() {
        let resolver = CurrencyResolver::default();
        let fx = resolver.resolve("eur", dec!(10.005), Some(dec!(3))).unwrap();
        assert_eq!(fx.exchange_rate_to_eur, Decimal::ONE);
        assert_eq!(fx.amount_eur, dec!(10.01));
    }

    #[test]
    fn test_reporting_currency_is_trimmed() {
        let resolver = CurrencyResolver::new(" eur ");
        assert_eq!(resolver.reporting_currency(), "EUR");
        assert!(resolver.is_reporting_currency(" Eur"));
    }

    #[test]
    fn test_foreign_currency_conversion() {
        let resolver = CurrencyResolver::default();
        let fx = resolver.resolve("USD", dec!(250), Some(dec!(0.91))).unwrap();
        assert_eq!(fx.exchange_rate_to_eur, dec!(0.91));
        assert_eq!(fx.amount_eur, dec!(227.50));
    }

    #[test]
    fn test_amount_uses_rounded_rate() {
        // rate 1.0000005 rounds to 1.000001; 1000 * 1.000001 = 1000.001 -> 1000.00
        let resolver = CurrencyResolver::default();
        let fx = resolver
            .resolve("GBP", dec!(1000), Some(dec!(1.0000005)))
            .unwrap();
        assert_eq!(fx.exchange_rate_to_eur, dec!(1.000001));
        assert_eq!(fx.amount_eur, dec!(1000.00));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(-0.01))]
    fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
        let resolver = CurrencyResolver::default();
        assert_eq!(
            resolver.resolve("EUR", amount, None),
            Err(CurrencyError::InvalidAmount { amount })
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(dec!(0)))]
    #[case(Some(dec!(-1.2)))]
    #[case(Some(dec!(0.0000001)))]
    fn test_missing_rate_rejected(#[case] rate: Option<Decimal>) {
        let resolver = CurrencyResolver::default();
        let err = resolver.resolve("usd", dec!(10), rate).unwrap_err();
        assert_eq!(
            err,
            CurrencyError::MissingRate {
                currency: "USD".to_string(),
                reporting: "EUR".to_string(),
            }
        );
        assert_eq!(err.error_code(), "MISSING_RATE");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(2.335)), dec!(2.34));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_rate(dec!(0.1234565)), dec!(0.123457));
    }

    #[test]
    fn test_overflow_is_invalid_amount() {
        let resolver = CurrencyResolver::default();
        let result = resolver.resolve("USD", Decimal::MAX, Some(dec!(2)));
        assert!(matches!(result, Err(CurrencyError::InvalidAmount { .. })));
    }
}
