//! Identifier newtypes
//!
//! The inventory service uses integer primary keys, but ids also show up as
//! strings (query parameters, form values, token claims). Every id is carried
//! as a string and accepts either JSON representation on input.

use serde::{Deserialize, Serialize};

/// Wire representation of an id: a JSON string or a JSON integer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    /// String id (`"B7"`, `"3"`)
    Text(String),
    /// Integer id (`3`)
    Number(i64),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "IdRepr", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an id from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// An empty id means "nothing selected".
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl From<IdRepr> for $name {
            fn from(repr: IdRepr) -> Self {
                Self(repr.into())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a military base.
    BaseId
);

string_id!(
    /// Identifier of an equipment type.
    EquipmentTypeId
);

string_id!(
    /// Identifier of a user (personnel) record.
    UserId
);

string_id!(
    /// Identifier of a purchase, transfer, assignment, or expenditure record.
    RecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_accepts_number_and_string() {
        let from_number: BaseId = serde_json::from_str("7").unwrap();
        let from_string: BaseId = serde_json::from_str("\"B7\"").unwrap();

        assert_eq!(from_number.as_str(), "7");
        assert_eq!(from_string.as_str(), "B7");
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = EquipmentTypeId::new("12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12\"");
    }

    #[test]
    fn test_empty_id() {
        assert!(BaseId::new("").is_empty());
        assert!(BaseId::new("  ").is_empty());
        assert!(!BaseId::new("1").is_empty());
    }
}
