//! Admin-edited school settings.
//!
//! A tenant's administrators can override parts of the public template.
//! The record is persisted server-side and overlaid onto the assembled
//! [`crate::OrganizationConfig`] when present; every field is optional so
//! an empty record changes nothing.

use serde::{Deserialize, Serialize};

/// Tenant content overrides, keyed by organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_address: Option<String>,
}

impl SchoolSettings {
    /// Returns true when no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.school_name.is_none()
            && self.hero_title.is_none()
            && self.hero_subtitle.is_none()
            && self.about.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && self.contact_address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_empty() {
        assert!(SchoolSettings::default().is_empty());
    }

    #[test]
    fn settings_roundtrip_skips_unset_fields() {
        let settings = SchoolSettings {
            school_name: Some("Northside".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).expect("serialize");
        assert_eq!(json, r#"{"school_name":"Northside"}"#);
        let parsed: SchoolSettings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(settings, parsed);
    }
}
