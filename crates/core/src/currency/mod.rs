//! Reporting-currency normalization.
//!
//! Every amount that enters the pipeline is converted to the reporting
//! currency once, at intake, and the rate used is kept next to the converted
//! amount so the conversion can be audited later.

pub mod error;
pub mod resolution;

#[cfg(test)]
mod props;

pub use error::CurrencyError;
pub use resolution::{CurrencyResolver, FxResolution, round_half_away, round_money, round_rate};
