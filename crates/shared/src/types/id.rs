//! Typed IDs for type-safe entity references.
//!
//! Ids are opaque strings: the engine never interprets them, it only compares
//! them. Using typed IDs prevents accidentally passing an `ExpenseId` where a
//! `ParticipantId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID (UUID v4 rendered as a string).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(EventId, "Unique identifier for an event.");
typed_id!(
    ParticipantId,
    "Unique identifier for a participant within an event."
);
typed_id!(ExpenseId, "Unique identifier for an expense.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_id_new_is_uuid() {
        let id = ParticipantId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_typed_id_new_is_unique() {
        assert_ne!(ExpenseId::new(), ExpenseId::new());
    }

    #[test]
    fn test_typed_id_accepts_any_string() {
        let id = ParticipantId::from("alice");
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
        assert_eq!(id.into_inner(), "alice".to_string());
    }

    #[test]
    fn test_typed_id_serde_transparent() {
        let id = EventId::from("evt-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"evt-1\"");

        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
