//! Authentication routes: login, callback, handoff, student login, logout.
//!
//! The callback and handoff handlers are the session bootstrap: persist
//! the bearer token, fetch and normalize the profile, resolve the role,
//! persist the session, and redirect to the role's dashboard. A failed
//! profile fetch is terminal for that load — the user lands back on the
//! public site, with no retry.

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chalkline_platform_access::{BearerToken, Session, SessionId, UserProfile};
use chrono::Duration as ChronoDuration;
use serde::Deserialize;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{
    AUTH_STATE_COOKIE, AppState, SESSION_COOKIE, STUDENT_SESSION_COOKIE,
    db::{SessionRepository, generate_session_id},
    student::StudentAuthError,
};
use crate::tenancy::RequestSubdomain;

/// Query parameters for the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

/// Query parameters for the cross-subdomain token handoff.
#[derive(Debug, Deserialize)]
pub struct HandoffQuery {
    access_token: String,
}

/// Form body for the student credential login.
#[derive(Debug, Deserialize)]
pub struct StudentLoginForm {
    username: String,
    date_of_birth: String,
}

/// Initiates the OAuth login flow by redirecting to the identity provider.
pub async fn login(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (auth_url, auth_state) = state.oauth_client.authorization_url();

    // Store the auth state in a secure cookie for validation on callback
    let auth_state_json = serde_json::to_string(&AuthStateData {
        csrf_token: auth_state.csrf_token,
        pkce_verifier: auth_state.pkce_verifier,
    })
    .expect("serialize auth state");

    let cookie = Cookie::build((AUTH_STATE_COOKIE, auth_state_json))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    (jar.add(cookie), Redirect::to(&auth_url))
}

/// Handles the OAuth callback after the user authenticates with the provider.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    RequestSubdomain(host_subdomain): RequestSubdomain,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<Response, AuthError> {
    // Retrieve and validate auth state from cookie
    let auth_state_cookie = jar
        .get(AUTH_STATE_COOKIE)
        .ok_or(AuthError::MissingAuthState)?;

    let auth_state: AuthStateData =
        serde_json::from_str(auth_state_cookie.value()).map_err(|_| AuthError::InvalidAuthState)?;

    // Validate CSRF token
    if query.state != auth_state.csrf_token {
        return Err(AuthError::CsrfMismatch);
    }

    let grant = state
        .oauth_client
        .exchange_code(&query.code, &auth_state.pkce_verifier)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let remove_auth_state = removal_cookie(AUTH_STATE_COOKIE);
    let ttl = token_ttl(state.session_config.duration_hours, grant.expires_in_seconds);

    let profile = match state.identity_client.fetch_profile(&grant.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "profile fetch after token exchange failed");
            return Ok((jar.add(remove_auth_state), Redirect::to("/")).into_response());
        }
    };

    // A user who logged in on another tenant's host is handed off to
    // their own tenant with the freshly minted token.
    let target = state
        .directory_client
        .target_subdomain(profile.org_id.as_ref(), &grant.access_token, &host_subdomain)
        .await;
    if target != host_subdomain {
        let url = handoff_url(&target, &state.tenancy_config.root_domain, &grant.access_token);
        return Ok((jar.add(remove_auth_state), Redirect::to(&url)).into_response());
    }

    let session = persist_session(&state, profile, &grant.access_token, ttl).await?;
    let cookie = session_cookie(
        SESSION_COOKIE,
        session.id().as_str().to_string(),
        state.session_config.secure_cookies,
        ttl,
    );
    let dashboard = session.role().dashboard_path();

    Ok((jar.add(cookie).add(remove_auth_state), Redirect::to(dashboard)).into_response())
}

/// Handles the cross-subdomain token handoff.
///
/// The token was minted by a callback on another tenant's host; this
/// handler runs the same persist → fetch → resolve → redirect pipeline
/// for it, leaving the token-bearing URL behind.
pub async fn handoff(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HandoffQuery>,
    jar: CookieJar,
) -> Result<Response, AuthError> {
    let ttl = token_ttl(state.session_config.duration_hours, None);

    let profile = match state.identity_client.fetch_profile(&query.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "profile fetch during token handoff failed");
            return Ok(Redirect::to("/").into_response());
        }
    };

    let session = persist_session(&state, profile, &query.access_token, ttl).await?;
    let cookie = session_cookie(
        SESSION_COOKIE,
        session.id().as_str().to_string(),
        state.session_config.secure_cookies,
        ttl,
    );
    let dashboard = session.role().dashboard_path();

    Ok((jar.add(cookie), Redirect::to(dashboard)).into_response())
}

/// Handles the student credential login.
pub async fn student_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<StudentLoginForm>,
) -> Result<Response, AuthError> {
    let student = state
        .student_client
        .authenticate(&form.username, &form.date_of_birth)
        .await
        .map_err(|e| match e {
            StudentAuthError::Rejected | StudentAuthError::InvalidBirthDate { .. } => {
                AuthError::InvalidStudentCredentials
            }
            other => AuthError::StudentAuthUpstream(other.to_string()),
        })?;

    let ttl = ChronoDuration::hours(state.session_config.duration_hours);
    let session_id = generate_session_id();
    SessionRepository::new(state.db_pool.clone())
        .create_student(&session_id, &student, ttl)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    let cookie = session_cookie(
        STUDENT_SESSION_COOKIE,
        session_id.as_str().to_string(),
        state.session_config.secure_cookies,
        ttl,
    );

    Ok((jar.add(cookie), Redirect::to(student.role().dashboard_path())).into_response())
}

/// Logs out by deleting every persisted record for this browser session.
///
/// This is the single clear-everything path: both record kinds and both
/// cookies go at once.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let repo = SessionRepository::new(state.db_pool.clone());

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let _ = repo.delete(&SessionId::from(cookie.value())).await;
    }
    if let Some(cookie) = jar.get(STUDENT_SESSION_COOKIE) {
        let _ = repo.delete(&SessionId::from(cookie.value())).await;
    }

    let jar = jar
        .add(removal_cookie(SESSION_COOKIE))
        .add(removal_cookie(STUDENT_SESSION_COOKIE));

    (jar, Redirect::to("/"))
}

/// Persists a fresh OAuth session for a normalized profile.
async fn persist_session(
    state: &AppState,
    profile: UserProfile,
    access_token: &str,
    ttl: ChronoDuration,
) -> Result<Session, AuthError> {
    let token = BearerToken::new(access_token, ttl);
    let session = Session::new(generate_session_id(), profile, token, ttl);

    SessionRepository::new(state.db_pool.clone())
        .create_user(&session)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(session)
}

/// Picks the bearer-token TTL: the configured duration, capped by the
/// provider's own expiry when it reports a shorter one.
fn token_ttl(configured_hours: i64, expires_in_seconds: Option<u64>) -> ChronoDuration {
    let configured = ChronoDuration::hours(configured_hours);
    match expires_in_seconds {
        Some(secs) => configured.min(ChronoDuration::seconds(secs.min(i64::MAX as u64) as i64)),
        None => configured,
    }
}

/// Builds the handoff URL on the target tenant's host.
fn handoff_url(target_subdomain: &str, root_domain: &str, access_token: &str) -> String {
    let mut url = oauth2::url::Url::parse(&format!(
        "https://{target_subdomain}.{root_domain}/auth/handoff"
    ))
    .expect("valid handoff URL");
    url.query_pairs_mut().append_pair("access_token", access_token);
    url.to_string()
}

fn session_cookie(
    name: &'static str,
    value: String,
    secure: bool,
    ttl: ChronoDuration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::seconds(ttl.num_seconds()))
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(TimeDuration::ZERO)
        .build()
}

/// Serializable auth state for cookie storage.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct AuthStateData {
    csrf_token: String,
    pkce_verifier: String,
}

/// Authentication errors.
#[derive(Debug)]
pub enum AuthError {
    MissingAuthState,
    InvalidAuthState,
    CsrfMismatch,
    TokenExchange(String),
    InvalidStudentCredentials,
    StudentAuthUpstream(String),
    Database(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthState => (StatusCode::BAD_REQUEST, "Missing auth state"),
            Self::InvalidAuthState => (StatusCode::BAD_REQUEST, "Invalid auth state"),
            Self::CsrfMismatch => (StatusCode::BAD_REQUEST, "CSRF token mismatch"),
            Self::TokenExchange(msg) => {
                tracing::error!("Token exchange failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::InvalidStudentCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or date of birth",
            ),
            Self::StudentAuthUpstream(msg) => {
                tracing::error!("Student auth failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ttl_defaults_to_configured_duration() {
        assert_eq!(token_ttl(24, None), ChronoDuration::hours(24));
    }

    #[test]
    fn token_ttl_is_capped_by_provider_expiry() {
        assert_eq!(token_ttl(24, Some(3600)), ChronoDuration::seconds(3600));
    }

    #[test]
    fn token_ttl_ignores_longer_provider_expiry() {
        assert_eq!(token_ttl(24, Some(60 * 60 * 48)), ChronoDuration::hours(24));
    }

    #[test]
    fn handoff_url_targets_the_tenant_host() {
        let url = handoff_url("north", "chalkline.app", "abc123");
        assert_eq!(
            url,
            "https://north.chalkline.app/auth/handoff?access_token=abc123"
        );
    }

    #[test]
    fn handoff_url_encodes_the_token() {
        let url = handoff_url("north", "chalkline.app", "a b&c");
        assert!(url.contains("access_token=a+b%26c"));
    }

    #[test]
    fn auth_state_roundtrips_through_json() {
        let state = AuthStateData {
            csrf_token: "csrf".to_string(),
            pkce_verifier: "verifier".to_string(),
        };
        let json = serde_json::to_string(&state).expect("serialize");
        let parsed: AuthStateData = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.csrf_token, "csrf");
        assert_eq!(parsed.pkce_verifier, "verifier");
    }
}
