//! Shared HTTP helpers for upstream API calls.
//!
//! All upstream traffic goes through these helpers so the retry policy
//! lives in exactly one place: a single retry on a 5xx response (the
//! upstream's transient cold starts), nothing else.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Errors from upstream HTTP calls.
#[derive(Debug)]
pub enum UpstreamError {
    /// The request could not be sent or the connection failed.
    Network { details: String },
    /// The upstream answered with a non-success status.
    Status { status: u16 },
    /// The response body did not match the expected shape.
    Decode { details: String },
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { details } => write!(f, "upstream request failed: {details}"),
            Self::Status { status } => write!(f, "upstream returned status {status}"),
            Self::Decode { details } => write!(f, "failed to decode upstream response: {details}"),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl UpstreamError {
    /// Returns true when the status indicates an auth failure.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403 })
    }
}

/// Whether a failed attempt should be retried.
///
/// Only the first 5xx is retried; 4xx responses are the caller's problem
/// and a second 5xx is treated as a real outage.
#[must_use]
pub fn should_retry(status: reqwest::StatusCode, attempt: u32) -> bool {
    status.is_server_error() && attempt == 0
}

/// GETs a JSON document, optionally with a bearer token.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
) -> Result<T, UpstreamError> {
    let mut attempt = 0;
    loop {
        let mut request = client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| UpstreamError::Network {
            details: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| UpstreamError::Decode {
                details: e.to_string(),
            });
        }

        if should_retry(status, attempt) {
            tracing::debug!(status = %status, url, "retrying transient upstream failure");
            attempt += 1;
            continue;
        }

        return Err(UpstreamError::Status {
            status: status.as_u16(),
        });
    }
}

/// POSTs a JSON body and decodes the JSON response.
pub async fn post_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    body: &impl Serialize,
) -> Result<T, UpstreamError> {
    let mut attempt = 0;
    loop {
        let response = client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::Network {
                details: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| UpstreamError::Decode {
                details: e.to_string(),
            });
        }

        if should_retry(status, attempt) {
            tracing::debug!(status = %status, url, "retrying transient upstream failure");
            attempt += 1;
            continue;
        }

        return Err(UpstreamError::Status {
            status: status.as_u16(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn first_5xx_is_retried() {
        assert!(should_retry(StatusCode::INTERNAL_SERVER_ERROR, 0));
        assert!(should_retry(StatusCode::BAD_GATEWAY, 0));
    }

    #[test]
    fn second_5xx_is_not_retried() {
        assert!(!should_retry(StatusCode::INTERNAL_SERVER_ERROR, 1));
    }

    #[test]
    fn client_errors_are_never_retried() {
        assert!(!should_retry(StatusCode::UNAUTHORIZED, 0));
        assert!(!should_retry(StatusCode::NOT_FOUND, 0));
    }

    #[test]
    fn unauthorized_statuses_are_detected() {
        assert!(UpstreamError::Status { status: 401 }.is_unauthorized());
        assert!(UpstreamError::Status { status: 403 }.is_unauthorized());
        assert!(!UpstreamError::Status { status: 500 }.is_unauthorized());
        assert!(
            !UpstreamError::Network {
                details: "x".to_string()
            }
            .is_unauthorized()
        );
    }
}
