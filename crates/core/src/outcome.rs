//! Result of a multi-step operation whose primary write succeeded.
//!
//! Cascade writes that fail after the primary write are not rolled back;
//! they surface here as warnings next to the successful value. An `Err`
//! from a service always means the primary write did not happen.

use serde::Serialize;

/// Successful value plus non-fatal warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    /// The primary record.
    pub value: T,
    /// Cascade failures and degraded computations, in the order they occurred.
    pub warnings: Vec<String>,
}

impl<T> Outcome<T> {
    /// An outcome without warnings.
    #[must_use]
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// An outcome carrying the given warnings.
    #[must_use]
    pub fn with_warnings(value: T, warnings: Vec<String>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if nothing degraded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Appends a warning.
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Maps the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
