//! Tenant directory types and routing decisions.
//!
//! An authenticated user may log in on another tenant's host. The
//! directory maps an organization id to its canonical subdomain so the
//! user is routed to their own tenant's data; when the lookup fails the
//! host-derived subdomain is used instead of failing the page load.

use chalkline_core::OrgId;
use serde::Deserialize;

/// One directory record: an organization and its canonical subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgDirectoryEntry {
    pub org_id: OrgId,
    pub subdomain: String,
}

/// Picks the subdomain a user should be routed to.
///
/// `canonical` is the directory lookup result for the user's organization,
/// `None` when the lookup failed or the user has no organization. The
/// host-derived subdomain is the fallback in every failure mode.
#[must_use]
pub fn target_subdomain(canonical: Option<&str>, host_subdomain: &str) -> String {
    match canonical {
        Some(s) if !s.trim().is_empty() => s.trim().to_ascii_lowercase(),
        _ => host_subdomain.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_subdomain_wins() {
        assert_eq!(target_subdomain(Some("north"), "acme"), "north");
    }

    #[test]
    fn failed_lookup_falls_back_to_host() {
        assert_eq!(target_subdomain(None, "acme"), "acme");
        assert_eq!(target_subdomain(Some("  "), "acme"), "acme");
    }

    #[test]
    fn canonical_is_case_folded() {
        assert_eq!(target_subdomain(Some("North"), "acme"), "north");
    }

    #[test]
    fn directory_entry_deserializes() {
        let entry: OrgDirectoryEntry =
            serde_json::from_str(r#"{"org_id": "O1", "subdomain": "north"}"#).expect("parse");
        assert_eq!(entry.org_id, OrgId::new("O1"));
        assert_eq!(entry.subdomain, "north");
    }
}
