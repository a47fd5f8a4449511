//! Raw upstream payloads for a tenant's public content.
//!
//! Every field is optional: the source services omit whatever an
//! organization has not filled in, and individual endpoints may be missing
//! from an aggregate entirely. The display-ready shape with defaults is
//! built in [`crate::config`].

use serde::Deserialize;

/// The aggregate of all upstream responses for one tenant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawApiData {
    #[serde(default)]
    pub content: Option<RawContent>,
    #[serde(default)]
    pub branding: Option<RawBranding>,
    #[serde(default)]
    pub contact: Option<RawContact>,
    #[serde(default)]
    pub stats: Option<RawStats>,
    #[serde(default)]
    pub faculty: Option<Vec<RawFacultyMember>>,
}

/// Marketing copy: hero, about, programs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub hero_title: Option<String>,
    #[serde(default)]
    pub hero_subtitle: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub programs: Option<Vec<RawProgram>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProgram {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBranding {
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub students: Option<u32>,
    #[serde(default)]
    pub teachers: Option<u32>,
    #[serde(default)]
    pub programs: Option<u32>,
    #[serde(default)]
    pub years_active: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFacultyMember {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
