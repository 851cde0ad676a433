//! Platform registration task types.

use std::fmt;

use billtrack_shared::types::{InvoiceId, PlatformTaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform task status.
///
/// Pending → InProgress → Completed, with Blocked reachable from Pending or
/// InProgress and left again by starting the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformTaskStatus {
    /// Not started.
    Pending,
    /// Registration under way.
    InProgress,
    /// Registered on the platform.
    Completed,
    /// Waiting on the client or the platform.
    Blocked,
}

impl PlatformTaskStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for PlatformTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registration of a client invoice on one client platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTask {
    /// Task ID.
    pub id: PlatformTaskId,
    /// Invoice to register.
    pub invoice_id: InvoiceId,
    /// Client platform name.
    pub platform: String,
    /// Task status.
    pub status: PlatformTaskStatus,
    /// Why the task is blocked.
    pub blocked_reason: Option<String>,
    /// When the task was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Operator who created the task.
    pub created_by: UserId,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task last changed.
    pub updated_at: DateTime<Utc>,
}
