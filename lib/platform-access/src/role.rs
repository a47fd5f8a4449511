//! Role types and the shared role resolver.
//!
//! Dashboard routing is gated by exactly one of three roles. The role is
//! derived from the normalized profile by [`Role::resolve`], and every
//! caller (OAuth callback, token handoff, session extractors, dashboard
//! handlers) goes through that one function.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Permission map as delivered by the identity service, normalized to
/// string keys and values at the ingestion boundary.
pub type PermissionMap = HashMap<String, String>;

/// Permission keys that grant organization-wide administration.
const ADMIN_KEYS: &[&str] = &["org", "admin", "organization_admin"];

/// Permission keys that grant teaching access.
const TEACHER_KEYS: &[&str] = &["teacher", "instructor"];

/// Prefix for per-team grants; any `team-*` key implies teaching access.
const TEAM_KEY_PREFIX: &str = "team-";

/// Platform role derived from the normalized user profile.
///
/// Precedence, highest first:
/// 1. An explicit `faculty` profile type wins over permission inspection.
/// 2. An `org`, `admin`, or `organization_admin` permission key grants admin.
/// 3. A `teacher` or `instructor` key, or any `team-*` key, grants teacher.
/// 4. Everything else is a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Organization administrator.
    Admin,
    /// Teaching staff.
    Teacher,
    /// Student (the default when nothing else matches).
    Student,
}

impl Role {
    /// Resolves the role for a profile.
    ///
    /// `profile_type` is the explicit `type`/`role` marker from the identity
    /// service (e.g. `"faculty"`), checked before the permission map.
    #[must_use]
    pub fn resolve(profile_type: Option<&str>, permissions: &PermissionMap) -> Self {
        if profile_type.is_some_and(|t| t.eq_ignore_ascii_case("faculty")) {
            return Self::Teacher;
        }

        if permissions.keys().any(|k| ADMIN_KEYS.contains(&k.as_str())) {
            return Self::Admin;
        }

        if permissions
            .keys()
            .any(|k| TEACHER_KEYS.contains(&k.as_str()) || k.starts_with(TEAM_KEY_PREFIX))
        {
            return Self::Teacher;
        }

        Self::Student
    }

    /// Returns the dashboard route this role is sent to after login.
    #[must_use]
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Admin => "/dashboard",
            Self::Teacher => "/teacher-dashboard",
            Self::Student => "/student-dashboard",
        }
    }

    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the role name as stored in session records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(pairs: &[(&str, &str)]) -> PermissionMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn org_key_grants_admin_regardless_of_other_keys() {
        let permissions = perms(&[
            ("org", "manage"),
            ("team-maths", "member"),
            ("teacher", "yes"),
        ]);
        assert_eq!(Role::resolve(None, &permissions), Role::Admin);
    }

    #[test]
    fn organization_admin_key_grants_admin() {
        let permissions = perms(&[("organization_admin", "true")]);
        assert_eq!(Role::resolve(None, &permissions), Role::Admin);
    }

    #[test]
    fn team_key_without_org_grants_teacher() {
        let permissions = perms(&[("team-robotics", "lead")]);
        assert_eq!(Role::resolve(None, &permissions), Role::Teacher);
    }

    #[test]
    fn instructor_key_grants_teacher() {
        let permissions = perms(&[("instructor", "grade-5")]);
        assert_eq!(Role::resolve(None, &permissions), Role::Teacher);
    }

    #[test]
    fn faculty_type_grants_teacher_with_empty_permissions() {
        let permissions = PermissionMap::new();
        assert_eq!(Role::resolve(Some("faculty"), &permissions), Role::Teacher);
    }

    #[test]
    fn faculty_type_is_checked_before_permissions() {
        // The explicit faculty marker wins even over a teacher-looking map.
        let permissions = perms(&[("team-chess", "member")]);
        assert_eq!(Role::resolve(Some("faculty"), &permissions), Role::Teacher);
    }

    #[test]
    fn faculty_type_is_case_insensitive() {
        let permissions = PermissionMap::new();
        assert_eq!(Role::resolve(Some("Faculty"), &permissions), Role::Teacher);
    }

    #[test]
    fn no_markers_defaults_to_student() {
        let permissions = perms(&[("library", "borrow")]);
        assert_eq!(Role::resolve(None, &permissions), Role::Student);
        assert_eq!(Role::resolve(None, &PermissionMap::new()), Role::Student);
    }

    #[test]
    fn non_faculty_type_falls_through_to_permissions() {
        let permissions = perms(&[("admin", "all")]);
        assert_eq!(Role::resolve(Some("user"), &permissions), Role::Admin);
    }

    #[test]
    fn dashboard_paths() {
        assert_eq!(Role::Admin.dashboard_path(), "/dashboard");
        assert_eq!(Role::Teacher.dashboard_path(), "/teacher-dashboard");
        assert_eq!(Role::Student.dashboard_path(), "/student-dashboard");
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize");
        assert_eq!(json, "\"admin\"");
        let parsed: Role = serde_json::from_str("\"teacher\"").expect("deserialize");
        assert_eq!(parsed, Role::Teacher);
    }
}
