//! Per-tenant content aggregation for the public site.
//!
//! One tenant's public page is assembled from several independent
//! upstream endpoints. The aggregate is all-or-nothing: a missing section
//! (404) just means the organization has not filled it in, but any other
//! failure fails the whole load and the caller renders the terminal
//! "no data available" state — there is no partial-content mode.

use chalkline_content::{
    OrganizationConfig, RawApiData, RawBranding, RawContact, RawContent, RawFacultyMember,
    RawStats, SchoolSettings,
};
use serde::de::DeserializeOwned;

use crate::http::{self, UpstreamError};

/// Client for the organization content endpoints.
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    /// Creates a new content client.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetches one content section; a 404 means the section is simply
    /// absent for this tenant.
    async fn fetch_section<T: DeserializeOwned>(
        &self,
        subdomain: &str,
        section: &str,
    ) -> Result<Option<T>, UpstreamError> {
        let url = format!("{}/organizations/{}/{}", self.base_url, subdomain, section);
        match http::get_json::<T>(&self.http, &url, None).await {
            Ok(value) => Ok(Some(value)),
            Err(UpstreamError::Status { status: 404 }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Aggregates every upstream section for one tenant.
    pub async fn fetch_all_data(&self, subdomain: &str) -> Result<RawApiData, UpstreamError> {
        let (content, branding, contact, stats, faculty) = tokio::try_join!(
            self.fetch_section::<RawContent>(subdomain, "content"),
            self.fetch_section::<RawBranding>(subdomain, "branding"),
            self.fetch_section::<RawContact>(subdomain, "contact"),
            self.fetch_section::<RawStats>(subdomain, "stats"),
            self.fetch_section::<Vec<RawFacultyMember>>(subdomain, "faculty"),
        )?;

        Ok(RawApiData {
            content,
            branding,
            contact,
            stats,
            faculty,
        })
    }

    /// Builds the display-ready configuration for one tenant, with the
    /// admin-edited settings overlaid when present.
    pub async fn organization_config(
        &self,
        subdomain: &str,
        settings: Option<SchoolSettings>,
    ) -> Result<OrganizationConfig, UpstreamError> {
        let raw = self.fetch_all_data(subdomain).await?;
        let mut config = OrganizationConfig::from_raw(subdomain, raw);
        if let Some(settings) = settings {
            config.apply_settings(&settings);
        }
        Ok(config)
    }
}
