//! Session extractors for Axum routes.
//!
//! The extractors implement the bootstrap precedence: the persisted
//! student session is consulted before the OAuth session, and exactly one
//! identity drives a request. Expired and corrupt records are deleted by
//! the repository read path, so a stale cookie simply reads as
//! unauthenticated.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chalkline_platform_access::{ActiveIdentity, SessionId};
use std::sync::Arc;

use super::{AppState, SESSION_COOKIE, STUDENT_SESSION_COOKIE, db::SessionRepository};

/// Extractor for requiring an authenticated identity.
///
/// If no identity is active, the user is redirected to the login page.
pub struct RequireAuth(pub ActiveIdentity);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::InternalError)?;

        let repo = SessionRepository::new(app_state.db_pool.clone());

        // Student record first: it wins over an OAuth session when both exist.
        let student = match jar.get(STUDENT_SESSION_COOKIE) {
            Some(cookie) => repo
                .find_student(&SessionId::from(cookie.value()))
                .await
                .map_err(|_| AuthRejection::InternalError)?,
            None => None,
        };

        let user = if student.is_none() {
            match jar.get(SESSION_COOKIE) {
                Some(cookie) => repo
                    .find_user(&SessionId::from(cookie.value()))
                    .await
                    .map_err(|_| AuthRejection::InternalError)?,
                None => None,
            }
        } else {
            None
        };

        ActiveIdentity::select(student, user)
            .map(RequireAuth)
            .ok_or(AuthRejection::NotAuthenticated)
    }
}

/// Extractor for optionally getting the active identity.
///
/// Returns None if the user is not authenticated.
pub struct OptionalAuth(pub Option<ActiveIdentity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match RequireAuth::from_request_parts(parts, state).await {
            Ok(RequireAuth(identity)) => Ok(OptionalAuth(Some(identity))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

/// Extractor for requiring an admin identity.
pub struct RequireAdmin(pub ActiveIdentity);

impl<S> FromRequestParts<S> for RequireAdmin
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;

        if !identity.role().is_admin() {
            return Err(AuthRejection::AdminRequired);
        }

        Ok(RequireAdmin(identity))
    }
}

/// Rejection type for session extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated,
    AdminRequired,
    InternalError,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => Redirect::to("/auth/login").into_response(),
            Self::AdminRequired => (StatusCode::FORBIDDEN, "Admin access required").into_response(),
            Self::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
