//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `BatchId` where an `InvoiceId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for an operator or partner.");
typed_id!(JobId, "Unique identifier for a client job (matter).");
typed_id!(VendorId, "Unique identifier for a vendor.");
typed_id!(IntakeItemId, "Unique identifier for an intake item.");
typed_id!(BatchId, "Unique identifier for a billing batch.");
typed_id!(BatchItemId, "Unique identifier for a billing batch item.");
typed_id!(InvoiceId, "Unique identifier for a client invoice.");
typed_id!(PlatformTaskId, "Unique identifier for a platform registration task.");
typed_id!(SapPostingId, "Unique identifier for an accounting posting.");
typed_id!(ClaimId, "Unique identifier for a collection claim.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
