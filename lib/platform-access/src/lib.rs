//! Platform access, authentication, and authorization for chalkline.
//!
//! This crate provides:
//! - The single role resolver (`Role`) shared by every routing decision
//! - Normalized user profiles (`UserProfile`) and the identity-document
//!   ingestion boundary (`IdentityDocument`)
//! - Session records (`Session`, `StudentSession`) with TTL semantics and
//!   the active-identity precedence rule (`ActiveIdentity`)
//! - Authentication error types
//!
//! # Access Control Model
//!
//! Dashboard routing is gated by exactly one of three roles — admin,
//! teacher, or student — derived once at profile-normalization time and
//! re-derivable from the cached permission map. A credential-based student
//! session always takes precedence over an OAuth session.
//!
//! # Example
//!
//! ```
//! use chalkline_platform_access::{IdentityDocument, Role};
//!
//! let body = r#"{"data": {"id": "usr-1", "attributes": {"type": "faculty"}}}"#;
//! let profile = IdentityDocument::from_json(body)
//!     .expect("parse identity response")
//!     .normalize("bearer-token")
//!     .expect("normalize profile");
//!
//! assert_eq!(profile.role, Role::Teacher);
//! assert_eq!(profile.role.dashboard_path(), "/teacher-dashboard");
//! ```

pub mod error;
pub mod profile;
pub mod role;
pub mod session;

// Re-export main types at crate root
pub use error::{AuthenticationError, AuthorizationError};
pub use profile::{IdentityDocument, UserProfile};
pub use role::{PermissionMap, Role};
pub use session::{
    ActiveIdentity, BearerToken, PROFILE_TTL_HOURS, Session, SessionId, StudentSession,
};
