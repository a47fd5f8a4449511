//! Tenant resolution for requests.
//!
//! The tenant is derived from the request host's leftmost label. For
//! authenticated users whose organization lives on another subdomain, the
//! tenant directory resolves the canonical one; a failed lookup falls
//! back to the host-derived subdomain instead of failing the page load.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use chalkline_core::OrgId;
use chalkline_tenancy::{OrgDirectoryEntry, subdomain_from_host, target_subdomain};
use std::convert::Infallible;
use std::sync::Arc;

use crate::auth::AppState;
use crate::http::{self, UpstreamError};

/// Extractor for the tenant subdomain the request arrived on.
///
/// Falls back to the configured literal for hosts with no recognizable
/// tenant label, so it never rejects.
pub struct RequestSubdomain(pub String);

impl<S> FromRequestParts<S> for RequestSubdomain
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        Ok(Self(subdomain_from_host(
            host,
            &app_state.tenancy_config.fallback_subdomain,
        )))
    }
}

/// Client for the tenant directory endpoint.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Creates a new directory client.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Looks up the canonical subdomain for an organization.
    async fn canonical_subdomain(
        &self,
        org_id: &OrgId,
        bearer: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!("{}/organizations/{}", self.base_url, org_id);
        let entry: OrgDirectoryEntry = http::get_json(&self.http, &url, Some(bearer)).await?;
        Ok(entry.subdomain)
    }

    /// Resolves the subdomain an authenticated user should be routed to.
    ///
    /// Users without an organization stay on the host-derived subdomain,
    /// and so does everyone when the directory lookup fails.
    pub async fn target_subdomain(
        &self,
        org_id: Option<&OrgId>,
        bearer: &str,
        host_subdomain: &str,
    ) -> String {
        let Some(org_id) = org_id else {
            return host_subdomain.to_string();
        };

        match self.canonical_subdomain(org_id, bearer).await {
            Ok(canonical) => target_subdomain(Some(&canonical), host_subdomain),
            Err(e) => {
                tracing::warn!(
                    org_id = %org_id,
                    error = %e,
                    "tenant directory lookup failed; using host subdomain"
                );
                host_subdomain.to_string()
            }
        }
    }
}
