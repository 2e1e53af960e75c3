//! Typed IDs for type-safe entity references.
//!
//! The source schema keys every row with a 64-bit integer. Wrapping them
//! prevents accidentally passing a `UnitId` where an `EntityId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(
    EntityId,
    "Identifier of a ledger owner (contact, raw material, crockery item, category)."
);
typed_id!(TransactionId, "Identifier of a posted transaction row.");
typed_id!(UnitId, "Identifier of a measurement unit.");
typed_id!(CategoryId, "Identifier of a contact or item category.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
