//! Tenant content assembly for the chalkline public site.
//!
//! The server aggregates several upstream endpoints per tenant into a
//! [`RawApiData`], and this crate turns that into the display-ready
//! [`OrganizationConfig`] — a pure, total mapping where every missing
//! upstream field has a documented default. Admin-edited
//! [`SchoolSettings`] are overlaid afterwards.

pub mod config;
pub mod raw;
pub mod settings;

pub use config::{
    Branding, Contact, FacultyMember, Hero, OrganizationConfig, Program, Stats,
};
pub use raw::{
    RawApiData, RawBranding, RawContact, RawContent, RawFacultyMember, RawProgram, RawStats,
};
pub use settings::SchoolSettings;
