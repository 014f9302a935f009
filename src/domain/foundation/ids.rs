//! Strongly-typed identifier value objects.
//!
//! Source records carry opaque text keys (`A001`, `D0042`, ...), so every
//! identifier wraps a non-empty string.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning error if empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

text_id!(
    /// Unique identifier for a customer account.
    AccountId,
    "account_id"
);

text_id!(
    /// Unique identifier for a sales representative.
    RepId,
    "rep_id"
);

text_id!(
    /// Unique identifier for a deal.
    DealId,
    "deal_id"
);

text_id!(
    /// Unique identifier for an activity touchpoint.
    ActivityId,
    "activity_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_empty_values() {
        assert!(AccountId::new("").is_err());
        assert!(RepId::new("   ").is_err());
        assert!(DealId::new("").is_err());
        assert!(ActivityId::new("").is_err());
    }

    #[test]
    fn id_error_names_the_field() {
        let err = DealId::new("").unwrap_err();
        assert_eq!(err.field(), "deal_id");
    }

    #[test]
    fn ids_display_inner_value() {
        let id = AccountId::new("A001").unwrap();
        assert_eq!(id.to_string(), "A001");
        assert_eq!(id.as_str(), "A001");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = RepId::new("R7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"R7\"");
        let back: RepId = serde_json::from_str("\"R7\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ids_order_lexicographically() {
        let a = DealId::new("D001").unwrap();
        let b = DealId::new("D002").unwrap();
        assert!(a < b);
    }
}
