//! Authentication module for the chalkline server.
//!
//! This module provides:
//! - OAuth authorization-code login with PKCE and a CSRF state cookie
//! - Student credential login (username + date of birth)
//! - Database-backed session storage with TTL semantics
//! - Session extractors implementing the bootstrap precedence
//!
//! # Session Bootstrap
//!
//! Exactly one identity drives a request, decided by sequential
//! early-return checks: the persisted student session is consulted first,
//! then the OAuth session. Expired or unparseable records are deleted on
//! read and the flow proceeds as unauthenticated. The role embedded in
//! the session row was resolved once, at profile-normalization time, by
//! the shared role resolver — no caller re-derives it with its own rules.

pub mod db;
pub mod identity;
pub mod middleware;
pub mod oauth;
pub mod routes;
pub mod student;

use crate::config::{SessionConfig, TenancyConfig};
use crate::content::ContentClient;
use crate::tenancy::DirectoryClient;
use sqlx::PgPool;

pub use identity::IdentityClient;
pub use middleware::{OptionalAuth, RequireAdmin, RequireAuth};
pub use oauth::OAuthClient;
pub use routes::{callback, handoff, login, logout, student_login};
pub use student::StudentAuthClient;

/// Cookie carrying the OAuth session id.
pub(crate) const SESSION_COOKIE: &str = "session";

/// Cookie carrying the student session id. Checked before [`SESSION_COOKIE`].
pub(crate) const STUDENT_SESSION_COOKIE: &str = "student_session";

/// Cookie carrying the OAuth flow state (CSRF token + PKCE verifier).
pub(crate) const AUTH_STATE_COOKIE: &str = "auth_state";

/// Shared application state.
pub struct AppState {
    /// Database connection pool.
    pub db_pool: PgPool,
    /// OAuth client for the login flow.
    pub oauth_client: OAuthClient,
    /// Identity endpoint client.
    pub identity_client: IdentityClient,
    /// Student credential login client.
    pub student_client: StudentAuthClient,
    /// Tenant directory client.
    pub directory_client: DirectoryClient,
    /// Organization content client.
    pub content_client: ContentClient,
    /// Session configuration.
    pub session_config: SessionConfig,
    /// Tenancy configuration.
    pub tenancy_config: TenancyConfig,
}
