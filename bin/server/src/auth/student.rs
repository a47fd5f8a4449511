//! Student credential login.
//!
//! Students authenticate with a username and date of birth instead of the
//! OAuth flow. The username is conventionally `<org_id>-<first_name>`;
//! the password sent upstream is the date of birth reformatted to
//! `DD/MM/YYYY` from the `YYYY-MM-DD` the HTML date input produces.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chalkline_core::{OrgId, StudentId};
use chalkline_platform_access::{PermissionMap, StudentSession};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::http::{self, UpstreamError};

/// Reformats an HTML date-input value (`YYYY-MM-DD`) to the `DD/MM/YYYY`
/// form the student auth endpoint expects.
pub fn format_birth_date(html_date: &str) -> Result<String, StudentAuthError> {
    let date = NaiveDate::parse_from_str(html_date.trim(), "%Y-%m-%d").map_err(|_| {
        StudentAuthError::InvalidBirthDate {
            value: html_date.to_string(),
        }
    })?;
    Ok(date.format("%d/%m/%Y").to_string())
}

/// Derives the organization id from a conventional student username
/// (`<org_id>-<first_name>`). Returns `None` for usernames without the
/// separator.
fn org_from_username(username: &str) -> Option<OrgId> {
    let (org, rest) = username.split_once('-')?;
    if org.is_empty() || rest.is_empty() {
        return None;
    }
    Some(OrgId::new(org))
}

/// Raw student auth response: `{ "data": { id, attributes } }`.
#[derive(Debug, Clone, Default, Deserialize)]
struct StudentAuthDocument {
    #[serde(default)]
    data: StudentAuthData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StudentAuthData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: StudentAuthAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StudentAuthAttributes {
    #[serde(default, alias = "studentId")]
    student_id: Option<String>,
    #[serde(default, alias = "orgId", alias = "org")]
    org_id: Option<String>,
    #[serde(default, alias = "firstName")]
    first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Client for the student credential login endpoint.
#[derive(Clone)]
pub struct StudentAuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl StudentAuthClient {
    /// Creates a new student auth client.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Authenticates a student and builds their session record.
    pub async fn authenticate(
        &self,
        username: &str,
        date_of_birth: &str,
    ) -> Result<StudentSession, StudentAuthError> {
        let password = format_birth_date(date_of_birth)?;

        let payload = json!({
            "data": {
                "type": "student_auth",
                "attributes": {
                    "username": username,
                    "password": password,
                }
            }
        });

        let url = format!("{}/students/auth", self.base_url);
        let document: StudentAuthDocument = http::post_json(&self.http, &url, &payload)
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    StudentAuthError::Rejected
                } else {
                    StudentAuthError::Upstream(e)
                }
            })?;

        let data = document.data;
        let id = data
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(StudentAuthError::MalformedResponse)?;
        let attributes = data.attributes;

        let org_id = attributes
            .org_id
            .filter(|o| !o.trim().is_empty())
            .map(OrgId::new)
            .or_else(|| org_from_username(username))
            .ok_or(StudentAuthError::MalformedResponse)?;

        Ok(StudentSession {
            student_id: StudentId::new(attributes.student_id.unwrap_or_else(|| id.clone())),
            id,
            org_id,
            first_name: attributes.first_name.unwrap_or_default(),
            last_name: attributes.last_name.unwrap_or_default(),
            email: attributes.email.unwrap_or_default(),
            basic_auth_token: BASE64.encode(format!("{username}:{password}")),
            permissions: PermissionMap::new(),
            authenticated_at: Utc::now(),
        })
    }
}

/// Student login errors.
#[derive(Debug)]
pub enum StudentAuthError {
    /// The date of birth was not a valid `YYYY-MM-DD` date.
    InvalidBirthDate { value: String },
    /// The upstream rejected the credentials.
    Rejected,
    /// The upstream response was missing required fields.
    MalformedResponse,
    /// The upstream call failed.
    Upstream(UpstreamError),
}

impl std::fmt::Display for StudentAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBirthDate { value } => {
                write!(f, "invalid date of birth: '{value}'")
            }
            Self::Rejected => write!(f, "student credentials were rejected"),
            Self::MalformedResponse => write!(f, "student auth response was malformed"),
            Self::Upstream(e) => write!(f, "student auth failed: {e}"),
        }
    }
}

impl std::error::Error for StudentAuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_date_reformats_to_day_month_year() {
        assert_eq!(format_birth_date("2001-09-14").expect("format"), "14/09/2001");
    }

    #[test]
    fn single_digit_fields_keep_their_zero_padding() {
        assert_eq!(format_birth_date("2010-01-05").expect("format"), "05/01/2010");
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(matches!(
            format_birth_date("14/09/2001"),
            Err(StudentAuthError::InvalidBirthDate { .. })
        ));
        assert!(matches!(
            format_birth_date("2001-13-40"),
            Err(StudentAuthError::InvalidBirthDate { .. })
        ));
        assert!(matches!(
            format_birth_date(""),
            Err(StudentAuthError::InvalidBirthDate { .. })
        ));
    }

    #[test]
    fn org_is_derived_from_conventional_username() {
        assert_eq!(org_from_username("org1-Alice"), Some(OrgId::new("org1")));
        assert_eq!(org_from_username("noseparator"), None);
        assert_eq!(org_from_username("-Alice"), None);
    }

    #[test]
    fn auth_document_tolerates_naming_variants() {
        let document: StudentAuthDocument = serde_json::from_str(
            r#"{"data": {"id": "rec-1", "attributes": {"studentId": "stu-1", "orgId": "org1"}}}"#,
        )
        .expect("parse");
        assert_eq!(document.data.id.as_deref(), Some("rec-1"));
        assert_eq!(document.data.attributes.student_id.as_deref(), Some("stu-1"));
        assert_eq!(document.data.attributes.org_id.as_deref(), Some("org1"));
    }

    #[test]
    fn basic_token_is_username_colon_password() {
        let encoded = BASE64.encode("org1-Alice:14/09/2001");
        let decoded = BASE64.decode(&encoded).expect("decode");
        assert_eq!(decoded, b"org1-Alice:14/09/2001");
    }
}
