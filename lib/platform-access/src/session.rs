//! Session records for authenticated identities.
//!
//! Two kinds of identity can drive a dashboard: an OAuth-authenticated
//! [`Session`] carrying a cached [`UserProfile`], and a credential-based
//! [`StudentSession`] created by the student login path. At most one of
//! them is the active identity for a request; when both exist the student
//! record takes precedence (see [`ActiveIdentity::select`]).

use chalkline_core::{OrgId, StudentId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::role::{PermissionMap, Role};

/// How long a cached profile (and its bearer token) stays valid.
pub const PROFILE_TTL_HOURS: i64 = 24;

/// A bearer token with its embedded expiry.
///
/// Exclusively owned by the session store; considered invalid once
/// `now > expiry` and treated as absent by every reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    value: String,
    expiry: DateTime<Utc>,
}

impl BearerToken {
    /// Creates a token expiring after the given duration.
    #[must_use]
    pub fn new(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            expiry: Utc::now() + ttl,
        }
    }

    /// Creates a token with an explicit expiry instant.
    #[must_use]
    pub fn with_expiry(value: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expiry,
        }
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the expiry instant.
    #[must_use]
    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Returns true once the embedded expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry
    }
}

/// Unique identifier for a session record.
///
/// Session IDs are opaque strings generated server-side at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An OAuth-authenticated session: the cached profile plus its token.
///
/// Created by the callback/handoff pipeline after the profile fetch, and
/// deleted when it expires, when its token expires, or on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    profile: UserProfile,
    token: BearerToken,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session valid for the given duration.
    #[must_use]
    pub fn new(id: SessionId, profile: UserProfile, token: BearerToken, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            profile,
            token,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the cached profile.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Returns the role cached at normalization time.
    #[must_use]
    pub fn role(&self) -> Role {
        self.profile.role
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true once either the session TTL or the token expiry has
    /// passed. Readers treat an expired session as absent.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at || self.token.is_expired()
    }
}

/// A credential-based student session, persisted independently of the
/// OAuth session.
///
/// Created by the student login path (username + date of birth) and read
/// back before any OAuth state is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSession {
    /// Identity-service record id for the authenticated student.
    pub id: String,
    pub student_id: StudentId,
    pub org_id: OrgId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    /// Basic-auth token sent on subsequent student API calls.
    pub basic_auth_token: String,
    #[serde(default)]
    pub permissions: PermissionMap,
    pub authenticated_at: DateTime<Utc>,
}

impl StudentSession {
    /// Student sessions always route to the student dashboard.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::Student
    }

    /// Parses a persisted student record.
    ///
    /// A parse failure means the record is corrupt; the caller deletes it
    /// and proceeds as unauthenticated.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        name.trim().to_string()
    }
}

/// The identity driving the current request.
#[derive(Debug, Clone)]
pub enum ActiveIdentity {
    /// Credential-based student session.
    Student(StudentSession),
    /// OAuth-authenticated session.
    User(Session),
}

impl ActiveIdentity {
    /// Picks the active identity when both record kinds may exist.
    ///
    /// The student record is checked first; an OAuth session only drives
    /// the request when no student session is present.
    #[must_use]
    pub fn select(student: Option<StudentSession>, user: Option<Session>) -> Option<Self> {
        if let Some(student) = student {
            return Some(Self::Student(student));
        }
        user.map(Self::User)
    }

    /// Returns the role for dashboard routing.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Student(s) => s.role(),
            Self::User(s) => s.role(),
        }
    }

    /// Returns the organization this identity belongs to, if known.
    #[must_use]
    pub fn org_id(&self) -> Option<&OrgId> {
        match self {
            Self::Student(s) => Some(&s.org_id),
            Self::User(s) => s.profile().org_id.as_ref(),
        }
    }

    /// Returns the display name for the dashboard greeting.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Student(s) => s.display_name(),
            Self::User(s) => s.profile().display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::IdentityDocument;

    fn test_profile() -> UserProfile {
        IdentityDocument::from_json(
            r#"{"data": {"id": "u1", "attributes": {"type": "faculty", "org_id": "O1"}}}"#,
        )
        .expect("parse")
        .normalize("tok")
        .expect("normalize")
    }

    fn test_student() -> StudentSession {
        StudentSession {
            id: "rec-1".to_string(),
            student_id: StudentId::new("stu-1"),
            org_id: OrgId::new("org1"),
            first_name: "Alice".to_string(),
            last_name: "Ng".to_string(),
            email: String::new(),
            basic_auth_token: "QWxhZGRpbg==".to_string(),
            permissions: PermissionMap::new(),
            authenticated_at: Utc::now(),
        }
    }

    #[test]
    fn expired_bearer_token_is_reported() {
        let token = BearerToken::with_expiry("abc", Utc::now() - Duration::seconds(1));
        assert!(token.is_expired());

        let token = BearerToken::new("abc", Duration::hours(PROFILE_TTL_HOURS));
        assert!(!token.is_expired());
    }

    #[test]
    fn session_expires_with_its_token() {
        // Session TTL still open, but the embedded token expiry has passed.
        let token = BearerToken::with_expiry("abc", Utc::now() - Duration::seconds(1));
        let session = Session::new(
            SessionId::from("sess-1"),
            test_profile(),
            token,
            Duration::hours(1),
        );
        assert!(session.is_expired());
    }

    #[test]
    fn session_with_valid_token_is_valid() {
        let token = BearerToken::new("abc", Duration::hours(PROFILE_TTL_HOURS));
        let session = Session::new(
            SessionId::from("sess-1"),
            test_profile(),
            token,
            Duration::hours(PROFILE_TTL_HOURS),
        );
        assert!(!session.is_expired());
        assert_eq!(session.role(), Role::Teacher);
    }

    #[test]
    fn student_session_parses_from_json() {
        let json = serde_json::to_string(&test_student()).expect("serialize");
        let parsed = StudentSession::from_json(&json).expect("parse");
        assert_eq!(parsed.student_id.as_str(), "stu-1");
        assert_eq!(parsed.role(), Role::Student);
    }

    #[test]
    fn corrupt_student_record_fails_to_parse() {
        assert!(StudentSession::from_json("not-json").is_err());
    }

    #[test]
    fn student_session_takes_precedence() {
        let token = BearerToken::new("abc", Duration::hours(1));
        let session = Session::new(
            SessionId::from("sess-1"),
            test_profile(),
            token,
            Duration::hours(1),
        );

        let active = ActiveIdentity::select(Some(test_student()), Some(session.clone()))
            .expect("identity");
        assert!(matches!(active, ActiveIdentity::Student(_)));
        assert_eq!(active.role(), Role::Student);

        let active = ActiveIdentity::select(None, Some(session)).expect("identity");
        assert!(matches!(active, ActiveIdentity::User(_)));
        assert_eq!(active.role(), Role::Teacher);

        assert!(ActiveIdentity::select(None, None).is_none());
    }

    #[test]
    fn active_identity_exposes_org() {
        let active = ActiveIdentity::select(Some(test_student()), None).expect("identity");
        assert_eq!(active.org_id().map(|o| o.as_str()), Some("org1"));
        assert_eq!(active.display_name(), "Alice Ng");
    }

    #[test]
    fn session_serialization_roundtrip() {
        let token = BearerToken::new("abc", Duration::hours(1));
        let session = Session::new(
            SessionId::from("sess-1"),
            test_profile(),
            token,
            Duration::hours(1),
        );
        let json = serde_json::to_string(&session).expect("serialize");
        let parsed: Session = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(session, parsed);
    }
}
