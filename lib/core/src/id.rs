//! Strongly-typed ID types for domain entities.
//!
//! Every identifier in this domain is minted by the upstream identity and
//! content services, so these types wrap the upstream-assigned opaque string
//! rather than generating values locally. The wrappers exist to keep a user
//! id from being passed where an organization id is expected.

use crate::error::ParseIdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate a strongly-typed ID wrapper around an opaque string.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from an upstream-assigned value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID, returning the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: "id must not be empty".to_string(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user, assigned by the identity service.
    UserId
);

define_id!(
    /// Unique identifier for an organization (one school tenant).
    OrgId
);

define_id!(
    /// Unique identifier for a student record within an organization.
    StudentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display_roundtrip() {
        let id = UserId::new("usr-42");
        assert_eq!(id.to_string(), "usr-42");
        assert_eq!(id.as_str(), "usr-42");
    }

    #[test]
    fn org_id_from_str_trims_whitespace() {
        let id: OrgId = " org1 ".parse().expect("should parse");
        assert_eq!(id.as_str(), "org1");
    }

    #[test]
    fn parse_empty_id_fails() {
        let result: Result<StudentId, _> = "   ".parse();
        let err = result.unwrap_err();
        assert_eq!(err.id_type, "StudentId");
    }

    #[test]
    fn id_equality_and_hash() {
        use std::collections::HashSet;

        let a = OrgId::new("org1");
        let b = OrgId::new("org1");
        let c = OrgId::new("org2");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip_is_transparent() {
        let id = UserId::new("usr-7");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"usr-7\"");
        let parsed: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }
}
