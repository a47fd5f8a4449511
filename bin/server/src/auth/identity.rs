//! Identity endpoint client.
//!
//! Given a bearer token, fetches `GET /users/me?include=permission` and
//! hands the response to the platform-access ingestion boundary, so the
//! rest of the server only ever sees the normalized [`UserProfile`].

use chalkline_platform_access::{AuthenticationError, IdentityDocument, UserProfile};

use crate::http::{self, UpstreamError};

/// Client for the upstream identity endpoint.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Creates a new identity client.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetches and normalizes the profile for a bearer token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, IdentityError> {
        let url = format!("{}/users/me?include=permission", self.base_url);
        let document: IdentityDocument =
            http::get_json(&self.http, &url, Some(access_token)).await?;
        Ok(document.normalize(access_token)?)
    }
}

/// Identity fetch errors.
#[derive(Debug)]
pub enum IdentityError {
    /// The upstream call failed.
    Upstream(UpstreamError),
    /// The response could not be normalized into a profile.
    Invalid(AuthenticationError),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upstream(e) => write!(f, "identity fetch failed: {e}"),
            Self::Invalid(e) => write!(f, "identity response invalid: {e}"),
        }
    }
}

impl std::error::Error for IdentityError {}

impl From<UpstreamError> for IdentityError {
    fn from(e: UpstreamError) -> Self {
        Self::Upstream(e)
    }
}

impl From<AuthenticationError> for IdentityError {
    fn from(e: AuthenticationError) -> Self {
        Self::Invalid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_display_is_prefixed() {
        let err = IdentityError::from(UpstreamError::Status { status: 502 });
        assert!(err.to_string().contains("identity fetch failed"));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn invalid_document_display_names_the_claim() {
        let err = IdentityError::from(AuthenticationError::MissingClaim {
            claim: "data.id".to_string(),
        });
        assert!(err.to_string().contains("data.id"));
    }
}
