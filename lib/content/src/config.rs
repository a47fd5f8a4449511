//! Display-ready organization content.
//!
//! [`OrganizationConfig::from_raw`] is a pure, total mapping: every field
//! has a defined default when the source endpoint omits it, so the public
//! site never renders an undefined value. The defaults are the ones
//! documented on each field.

use serde::{Deserialize, Serialize};

use crate::raw::RawApiData;
use crate::settings::SchoolSettings;

/// Default school name when branding is missing: `"Your School"`.
pub const DEFAULT_SCHOOL_NAME: &str = "Your School";
/// Default hero title when content is missing: `"Welcome"`.
pub const DEFAULT_HERO_TITLE: &str = "Welcome";
/// Default primary brand color.
pub const DEFAULT_PRIMARY_COLOR: &str = "#1f2937";
/// Default secondary brand color.
pub const DEFAULT_SECONDARY_COLOR: &str = "#f9fafb";

/// Branding block. Defaults: [`DEFAULT_SCHOOL_NAME`], empty logo URL, the
/// default color pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub school_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            school_name: DEFAULT_SCHOOL_NAME.to_string(),
            logo_url: String::new(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
        }
    }
}

/// Contact block. Defaults: empty strings throughout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Hero block. Defaults: [`DEFAULT_HERO_TITLE`], empty subtitle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            title: DEFAULT_HERO_TITLE.to_string(),
            subtitle: String::new(),
        }
    }
}

/// One academic program. Unnamed upstream entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub description: String,
}

/// Headline numbers. Defaults: zero everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub students: u32,
    pub teachers: u32,
    pub programs: u32,
    pub years_active: u32,
}

/// One faculty listing. Unnamed upstream entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyMember {
    pub name: String,
    pub title: String,
}

/// The assembled, display-ready content for one tenant.
///
/// Rebuilt on every page load from the upstream responses; read-only from
/// the UI's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Tenant subdomain this content was assembled for.
    pub subdomain: String,
    pub branding: Branding,
    pub hero: Hero,
    /// About copy. Default: empty string.
    pub about: String,
    pub programs: Vec<Program>,
    pub stats: Stats,
    pub contact: Contact,
    pub faculty: Vec<FacultyMember>,
}

impl OrganizationConfig {
    /// Assembles display-ready content from the raw upstream aggregate.
    ///
    /// Total: `from_raw(subdomain, RawApiData::default())` yields a fully
    /// populated config with the documented defaults.
    #[must_use]
    pub fn from_raw(subdomain: impl Into<String>, raw: RawApiData) -> Self {
        let branding = raw.branding.map_or_else(Branding::default, |b| Branding {
            school_name: b
                .school_name
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SCHOOL_NAME.to_string()),
            logo_url: b.logo_url.unwrap_or_default(),
            primary_color: b
                .primary_color
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
            secondary_color: b
                .secondary_color
                .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string()),
        });

        let (hero, about, programs) = match raw.content {
            Some(content) => (
                Hero {
                    title: content
                        .hero_title
                        .filter(|t| !t.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_HERO_TITLE.to_string()),
                    subtitle: content.hero_subtitle.unwrap_or_default(),
                },
                content.about.unwrap_or_default(),
                content
                    .programs
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|p| {
                        let name = p.name.filter(|n| !n.trim().is_empty())?;
                        Some(Program {
                            name,
                            description: p.description.unwrap_or_default(),
                        })
                    })
                    .collect(),
            ),
            None => (Hero::default(), String::new(), Vec::new()),
        };

        let stats = raw.stats.map_or_else(Stats::default, |s| Stats {
            students: s.students.unwrap_or_default(),
            teachers: s.teachers.unwrap_or_default(),
            programs: s.programs.unwrap_or_default(),
            years_active: s.years_active.unwrap_or_default(),
        });

        let contact = raw.contact.map_or_else(Contact::default, |c| Contact {
            email: c.email.unwrap_or_default(),
            phone: c.phone.unwrap_or_default(),
            address: c.address.unwrap_or_default(),
        });

        let faculty = raw
            .faculty
            .unwrap_or_default()
            .into_iter()
            .filter_map(|f| {
                let name = f.name.filter(|n| !n.trim().is_empty())?;
                Some(FacultyMember {
                    name,
                    title: f.title.unwrap_or_default(),
                })
            })
            .collect();

        Self {
            subdomain: subdomain.into(),
            branding,
            hero,
            about,
            programs,
            stats,
            contact,
            faculty,
        }
    }

    /// Overlays admin-edited settings onto the assembled content.
    pub fn apply_settings(&mut self, settings: &SchoolSettings) {
        if let Some(name) = &settings.school_name {
            self.branding.school_name = name.clone();
        }
        if let Some(title) = &settings.hero_title {
            self.hero.title = title.clone();
        }
        if let Some(subtitle) = &settings.hero_subtitle {
            self.hero.subtitle = subtitle.clone();
        }
        if let Some(about) = &settings.about {
            self.about = about.clone();
        }
        if let Some(email) = &settings.contact_email {
            self.contact.email = email.clone();
        }
        if let Some(phone) = &settings.contact_phone {
            self.contact.phone = phone.clone();
        }
        if let Some(address) = &settings.contact_address {
            self.contact.address = address.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawBranding, RawContent, RawProgram};

    #[test]
    fn empty_payload_is_fully_populated() {
        let config = OrganizationConfig::from_raw("acme", RawApiData::default());

        assert_eq!(config.subdomain, "acme");
        assert_eq!(config.branding.school_name, DEFAULT_SCHOOL_NAME);
        assert_eq!(config.branding.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(config.branding.secondary_color, DEFAULT_SECONDARY_COLOR);
        assert_eq!(config.hero.title, DEFAULT_HERO_TITLE);
        assert_eq!(config.hero.subtitle, "");
        assert_eq!(config.about, "");
        assert!(config.programs.is_empty());
        assert_eq!(config.stats, Stats::default());
        assert_eq!(config.contact, Contact::default());
        assert!(config.faculty.is_empty());
    }

    #[test]
    fn empty_json_payload_never_throws() {
        let raw: RawApiData = serde_json::from_str("{}").expect("parse");
        let config = OrganizationConfig::from_raw("acme", raw);
        assert_eq!(config.branding.school_name, DEFAULT_SCHOOL_NAME);
    }

    #[test]
    fn present_fields_pass_through() {
        let raw = RawApiData {
            branding: Some(RawBranding {
                school_name: Some("Northside High".to_string()),
                logo_url: Some("https://cdn.example.com/logo.png".to_string()),
                ..Default::default()
            }),
            content: Some(RawContent {
                hero_title: Some("Learn here".to_string()),
                programs: Some(vec![
                    RawProgram {
                        name: Some("Robotics".to_string()),
                        description: None,
                    },
                    // Unnamed entries are dropped rather than rendered blank.
                    RawProgram::default(),
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = OrganizationConfig::from_raw("north", raw);
        assert_eq!(config.branding.school_name, "Northside High");
        assert_eq!(config.branding.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(config.hero.title, "Learn here");
        assert_eq!(config.programs.len(), 1);
        assert_eq!(config.programs[0].name, "Robotics");
        assert_eq!(config.programs[0].description, "");
    }

    #[test]
    fn blank_school_name_gets_the_default() {
        let raw = RawApiData {
            branding: Some(RawBranding {
                school_name: Some("   ".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = OrganizationConfig::from_raw("acme", raw);
        assert_eq!(config.branding.school_name, DEFAULT_SCHOOL_NAME);
    }

    #[test]
    fn settings_overlay_overrides_assembled_content() {
        let mut config = OrganizationConfig::from_raw("acme", RawApiData::default());
        let settings = SchoolSettings {
            school_name: Some("Acme Academy".to_string()),
            hero_title: Some("Hello".to_string()),
            contact_email: Some("office@acme.example".to_string()),
            ..Default::default()
        };

        config.apply_settings(&settings);
        assert_eq!(config.branding.school_name, "Acme Academy");
        assert_eq!(config.hero.title, "Hello");
        assert_eq!(config.contact.email, "office@acme.example");
        // Untouched fields keep their defaults.
        assert_eq!(config.hero.subtitle, "");
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = OrganizationConfig::from_raw("acme", RawApiData::default());
        let json = serde_json::to_string(&config).expect("serialize");
        let parsed: OrganizationConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, parsed);
    }
}
