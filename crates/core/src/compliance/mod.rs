//! Compliance records read as guards by the intake and batching flows.
//!
//! Jobs carry the UTTAI flag and vendors their compliance status. Both are
//! owned by workflows outside this crate; here they are only read.

use std::fmt;

use billtrack_shared::types::{JobId, VendorId};
use serde::{Deserialize, Serialize};

/// UTTAI compliance flag on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UttaiStatus {
    /// No compliance objection.
    Clear,
    /// Intake and billing are blocked.
    Blocked,
    /// Under review; does not block.
    PendingReview,
}

impl UttaiStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Blocked => "blocked",
            Self::PendingReview => "pending_review",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clear" => Some(Self::Clear),
            "blocked" => Some(Self::Blocked),
            "pending_review" => Some(Self::PendingReview),
            _ => None,
        }
    }
}

impl fmt::Display for UttaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vendor compliance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorCompliance {
    /// Documentation is current.
    Compliant,
    /// Documentation expires soon; does not block.
    ExpiringSoon,
    /// Documentation missing or expired; blocks vendor invoices.
    NonCompliant,
}

impl VendorCompliance {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::ExpiringSoon => "expiring_soon",
            Self::NonCompliant => "non_compliant",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compliant" => Some(Self::Compliant),
            "expiring_soon" => Some(Self::ExpiringSoon),
            "non_compliant" => Some(Self::NonCompliant),
            _ => None,
        }
    }
}

impl fmt::Display for VendorCompliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client job (matter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job ID.
    pub id: JobId,
    /// Human-facing job code.
    pub code: String,
    /// Client name.
    pub client_name: String,
    /// Client country (ISO 3166 alpha-2).
    pub client_country: Option<String>,
    /// UTTAI compliance flag.
    pub uttai_status: UttaiStatus,
}

impl Job {
    /// Returns true if the UTTAI flag blocks intake and billing.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.uttai_status == UttaiStatus::Blocked
    }
}

/// Vendor issuing invoices against jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    /// Vendor ID.
    pub id: VendorId,
    /// Vendor name.
    pub name: String,
    /// Compliance status.
    pub compliance_status: VendorCompliance,
}

impl Vendor {
    /// Returns true if new vendor invoices must be refused.
    #[must_use]
    pub fn is_non_compliant(&self) -> bool {
        self.compliance_status == VendorCompliance::NonCompliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uttai_round_trip_strings() {
        for status in [
            UttaiStatus::Clear,
            UttaiStatus::Blocked,
            UttaiStatus::PendingReview,
        ] {
            assert_eq!(UttaiStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UttaiStatus::parse("BLOCKED"), Some(UttaiStatus::Blocked));
        assert_eq!(UttaiStatus::parse("unknown"), None);
    }

    #[test]
    fn test_only_blocked_blocks() {
        let mut job = Job {
            id: JobId::new(),
            code: "J-1".to_string(),
            client_name: "Acme".to_string(),
            client_country: None,
            uttai_status: UttaiStatus::PendingReview,
        };
        assert!(!job.is_blocked());
        job.uttai_status = UttaiStatus::Blocked;
        assert!(job.is_blocked());
    }

    #[test]
    fn test_vendor_compliance_strings() {
        assert_eq!(VendorCompliance::NonCompliant.to_string(), "non_compliant");
        assert_eq!(
            VendorCompliance::parse("expiring_soon"),
            Some(VendorCompliance::ExpiringSoon)
        );
    }
}
