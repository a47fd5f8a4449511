//! Shared response types for the server's JSON handlers.

use chalkline_content::OrganizationConfig;
use chalkline_platform_access::{ActiveIdentity, Role};

/// User info for display in dashboard headers.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    pub display_name: String,
    pub role: Role,
    pub org_id: Option<String>,
}

impl UserInfo {
    /// Builds the display info for an active identity.
    #[must_use]
    pub fn from_identity(identity: &ActiveIdentity) -> Self {
        Self {
            display_name: identity.display_name(),
            role: identity.role(),
            org_id: identity.org_id().map(|o| o.as_str().to_string()),
        }
    }
}

/// One navigation card on a dashboard.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NavCard {
    pub title: String,
    pub description: String,
    pub href: String,
}

impl NavCard {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        href: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            href: href.into(),
        }
    }
}

/// A role-specific dashboard payload.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DashboardView {
    pub user: UserInfo,
    pub cards: Vec<NavCard>,
}

/// The admin portal shell payload.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AdminPortalView {
    pub user: UserInfo,
    pub sections: Vec<NavCard>,
}

/// The public organization content.
///
/// `NoData` is the terminal state when the aggregate content fetch fails;
/// there is no partial-content variant.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrganizationPage {
    Ready { config: Box<OrganizationConfig> },
    NoData,
}

/// The public per-tenant home page: the organization content plus the
/// current login state, if any.
#[derive(Clone, Debug, serde::Serialize)]
pub struct HomePage {
    pub user: Option<UserInfo>,
    pub organization: OrganizationPage,
}
