//! Normalized user profiles and the identity-document ingestion boundary.
//!
//! The identity service addresses the same field under several names
//! depending on which upstream minted the record (`org_id` / `orgId` /
//! `org`, `first_name` / `firstName` / `given_name`, ...). All of those
//! variants are mapped to one canonical [`UserProfile`] here, once, so the
//! rest of the platform only ever sees the canonical shape.

use chalkline_core::{OrgId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AuthenticationError;
use crate::role::{PermissionMap, Role};

/// A normalized, canonical user profile.
///
/// Produced exclusively by [`IdentityDocument::normalize`] after a
/// successful identity-endpoint call, then cached in the session store for
/// the profile TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-service user id.
    pub id: UserId,
    /// Email address; empty when the identity service omits it.
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Role resolved at normalization time via [`Role::resolve`].
    pub role: Role,
    /// Normalized permission map.
    #[serde(default)]
    pub permissions: PermissionMap,
    /// Organization the user belongs to, when the identity service knows it.
    pub org_id: Option<OrgId>,
    /// Bearer token the profile was fetched with.
    pub access_token: String,
    /// When the profile was normalized; drives the cache TTL.
    pub cache_timestamp: DateTime<Utc>,
    /// Raw profile type marker (`"faculty"` and friends), kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
}

impl UserProfile {
    /// Returns the user's display name, built from the name fields.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        name.trim().to_string()
    }
}

/// Raw identity-endpoint response: `{ "data": { id, attributes, user_permissions } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityDocument {
    #[serde(default)]
    data: IdentityData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IdentityData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: IdentityAttributes,
    /// Permissions may arrive beside the attributes...
    #[serde(default)]
    user_permissions: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IdentityAttributes {
    #[serde(default, alias = "firstName", alias = "given_name")]
    first_name: Option<String>,
    #[serde(default, alias = "lastName", alias = "family_name")]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, rename = "type")]
    profile_type: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, alias = "orgId", alias = "org", alias = "organization_id")]
    org_id: Option<String>,
    /// ...or inside them, under either name.
    #[serde(default, alias = "permission")]
    permissions: Option<JsonValue>,
}

impl IdentityDocument {
    /// Parses an identity response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Normalizes the raw document into the canonical [`UserProfile`].
    ///
    /// The only hard requirement is the user id; every other field gets a
    /// defined default. The role is resolved here so that cached profiles
    /// already carry the routing decision.
    pub fn normalize(
        self,
        access_token: impl Into<String>,
    ) -> Result<UserProfile, AuthenticationError> {
        let data = self.data;
        let id = data
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(AuthenticationError::MissingClaim {
                claim: "data.id".to_string(),
            })?;

        let attributes = data.attributes;
        let permissions = normalize_permissions(
            data.user_permissions
                .or(attributes.permissions)
                .unwrap_or(JsonValue::Null),
        );

        let profile_type = attributes.profile_type.or(attributes.role);
        let role = Role::resolve(profile_type.as_deref(), &permissions);

        Ok(UserProfile {
            id: UserId::new(id),
            email: attributes.email.unwrap_or_default(),
            first_name: attributes.first_name.unwrap_or_default(),
            last_name: attributes.last_name.unwrap_or_default(),
            role,
            permissions,
            org_id: attributes
                .org_id
                .filter(|o| !o.trim().is_empty())
                .map(OrgId::new),
            access_token: access_token.into(),
            cache_timestamp: Utc::now(),
            profile_type,
        })
    }
}

/// Flattens the permission payload into `key -> value` strings.
///
/// Accepts the two shapes seen upstream: an object (non-string values are
/// stringified) or a bare array of permission names (each granted with an
/// empty value). Anything else normalizes to an empty map.
fn normalize_permissions(raw: JsonValue) -> PermissionMap {
    match raw {
        JsonValue::Object(map) => map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
        JsonValue::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| entry.as_str().map(|s| (s.to_string(), String::new())))
            .collect(),
        _ => PermissionMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_faculty_profile() {
        let body = r#"{
            "data": {
                "id": "usr-9",
                "attributes": {
                    "type": "faculty",
                    "email": "x@y.com",
                    "first_name": "A",
                    "last_name": "B",
                    "org_id": "O1"
                }
            }
        }"#;

        let profile = IdentityDocument::from_json(body)
            .expect("parse")
            .normalize("abc123")
            .expect("normalize");

        assert_eq!(profile.id.as_str(), "usr-9");
        assert_eq!(profile.role, Role::Teacher);
        assert_eq!(profile.email, "x@y.com");
        assert_eq!(profile.org_id, Some(OrgId::new("O1")));
        assert_eq!(profile.access_token, "abc123");
        assert_eq!(profile.display_name(), "A B");
    }

    #[test]
    fn org_id_naming_variants_all_normalize() {
        for field in ["org_id", "orgId", "org", "organization_id"] {
            let body = format!(
                r#"{{"data": {{"id": "u1", "attributes": {{"{field}": "acme"}}}}}}"#
            );
            let profile = IdentityDocument::from_json(&body)
                .expect("parse")
                .normalize("t")
                .expect("normalize");
            assert_eq!(profile.org_id, Some(OrgId::new("acme")), "field {field}");
        }
    }

    #[test]
    fn camel_case_names_normalize() {
        let body = r#"{
            "data": {
                "id": "u1",
                "attributes": {"firstName": "Ada", "lastName": "Lovelace"}
            }
        }"#;
        let profile = IdentityDocument::from_json(body)
            .expect("parse")
            .normalize("t")
            .expect("normalize");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
    }

    #[test]
    fn permissions_beside_attributes_resolve_admin() {
        let body = r#"{
            "data": {
                "id": "u1",
                "attributes": {},
                "user_permissions": {"org": "manage"}
            }
        }"#;
        let profile = IdentityDocument::from_json(body)
            .expect("parse")
            .normalize("t")
            .expect("normalize");
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.permissions.get("org").map(String::as_str), Some("manage"));
    }

    #[test]
    fn permission_array_grants_keys() {
        let permissions = normalize_permissions(serde_json::json!(["team-maths", "library"]));
        assert!(permissions.contains_key("team-maths"));
        assert!(permissions.contains_key("library"));
    }

    #[test]
    fn non_string_permission_values_are_stringified() {
        let permissions =
            normalize_permissions(serde_json::json!({"org": {"level": "manage"}, "n": 3}));
        assert_eq!(permissions.get("n").map(String::as_str), Some("3"));
        assert!(permissions.get("org").is_some());
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = IdentityDocument::from_json(r#"{"data": {"attributes": {}}}"#)
            .expect("parse")
            .normalize("t")
            .unwrap_err();
        assert!(matches!(err, AuthenticationError::MissingClaim { .. }));
    }

    #[test]
    fn empty_attributes_default_to_student() {
        let profile = IdentityDocument::from_json(r#"{"data": {"id": "u1"}}"#)
            .expect("parse")
            .normalize("t")
            .expect("normalize");
        assert_eq!(profile.role, Role::Student);
        assert!(profile.email.is_empty());
        assert!(profile.org_id.is_none());
        assert!(profile.permissions.is_empty());
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = IdentityDocument::from_json(
            r#"{"data": {"id": "u1", "attributes": {"type": "faculty"}}}"#,
        )
        .expect("parse")
        .normalize("tok")
        .expect("normalize");

        let json = serde_json::to_string(&profile).expect("serialize");
        let parsed: UserProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(profile, parsed);
    }
}
