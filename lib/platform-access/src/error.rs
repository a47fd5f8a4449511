//! Error types for the platform-access crate.
//!
//! - `AuthenticationError`: failures in verifying an identity
//! - `AuthorizationError`: failures in role checks

use crate::role::Role;
use std::fmt;

/// Errors from authentication operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// Bearer token was rejected by the identity service.
    InvalidToken { reason: String },
    /// Bearer token has passed its embedded expiry.
    TokenExpired,
    /// Session not found or invalid.
    InvalidSession { session_id: String },
    /// Session has expired.
    SessionExpired { session_id: String },
    /// A persisted record failed to parse and was deleted.
    MalformedRecord { key: String },
    /// Identity service error.
    ProviderError { reason: String },
    /// Missing required field in the identity response.
    MissingClaim { claim: String },
    /// Student credential login was rejected.
    StudentAuthFailed { reason: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { reason } => {
                write!(f, "invalid token: {reason}")
            }
            Self::TokenExpired => {
                write!(f, "token has expired")
            }
            Self::InvalidSession { session_id } => {
                write!(f, "invalid session: {session_id}")
            }
            Self::SessionExpired { session_id } => {
                write!(f, "session has expired: {session_id}")
            }
            Self::MalformedRecord { key } => {
                write!(f, "malformed persisted record: {key}")
            }
            Self::ProviderError { reason } => {
                write!(f, "identity provider error: {reason}")
            }
            Self::MissingClaim { claim } => {
                write!(f, "missing required claim: {claim}")
            }
            Self::StudentAuthFailed { reason } => {
                write!(f, "student authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from authorization operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// No active identity for the request.
    NotAuthenticated,
    /// Active identity does not carry the required role.
    RoleRequired { required: Role, actual: Role },
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => {
                write!(f, "user is not authenticated")
            }
            Self::RoleRequired { required, actual } => {
                write!(f, "route requires role '{required}', user has '{actual}'")
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_token_display() {
        let err = AuthenticationError::InvalidToken {
            reason: "signature mismatch".to_string(),
        };
        assert!(err.to_string().contains("invalid token"));
        assert!(err.to_string().contains("signature mismatch"));
    }

    #[test]
    fn malformed_record_display() {
        let err = AuthenticationError::MalformedRecord {
            key: "studentAuth".to_string(),
        };
        assert!(err.to_string().contains("studentAuth"));
    }

    #[test]
    fn role_required_display() {
        let err = AuthorizationError::RoleRequired {
            required: Role::Admin,
            actual: Role::Student,
        };
        assert!(err.to_string().contains("admin"));
        assert!(err.to_string().contains("student"));
    }
}
