//! Currency resolution errors.

use billtrack_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while resolving an amount into the reporting currency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Amount is zero, negative, or too large to convert.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// Foreign-currency amount without a usable exchange rate.
    #[error("Missing exchange rate to {reporting} for currency {currency}")]
    MissingRate {
        /// Currency of the amount.
        currency: String,
        /// Reporting currency the rate should convert into.
        reporting: String,
    },
}

impl CurrencyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::MissingRate { .. } => "MISSING_RATE",
        }
    }
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        Self::Validation(err.to_string())
    }
}
