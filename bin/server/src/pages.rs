//! Page handlers: the public organization site and the role dashboards.
//!
//! Each dashboard route belongs to one role. A logged-in user who lands
//! on another role's dashboard is redirected to their own rather than
//! shown an error, matching the role-gated routing of the login flow.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chalkline_platform_access::{ActiveIdentity, Role};
use std::sync::Arc;

use crate::auth::{AppState, OptionalAuth, RequireAdmin, RequireAuth, db::SchoolSettingsRepository};
use crate::tenancy::RequestSubdomain;
use crate::types::{AdminPortalView, DashboardView, HomePage, NavCard, OrganizationPage, UserInfo};

/// Liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}

/// The public per-tenant site.
///
/// Renders for anonymous visitors and authenticated users alike. When the
/// aggregate content fetch fails the terminal no-data state is returned;
/// partial content is never shown.
pub async fn home(
    State(state): State<Arc<AppState>>,
    RequestSubdomain(subdomain): RequestSubdomain,
    OptionalAuth(identity): OptionalAuth,
) -> Json<HomePage> {
    let settings = match SchoolSettingsRepository::new(state.db_pool.clone())
        .find_by_subdomain(&subdomain)
        .await
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(subdomain = %subdomain, error = %e, "school settings lookup failed");
            None
        }
    };

    let organization = match state
        .content_client
        .organization_config(&subdomain, settings)
        .await
    {
        Ok(config) => OrganizationPage::Ready {
            config: Box::new(config),
        },
        Err(e) => {
            tracing::error!(subdomain = %subdomain, error = %e, "organization content fetch failed");
            OrganizationPage::NoData
        }
    };

    Json(HomePage {
        user: identity.as_ref().map(UserInfo::from_identity),
        organization,
    })
}

/// Admin dashboard.
pub async fn admin_dashboard(RequireAuth(identity): RequireAuth) -> Response {
    dashboard_for(Role::Admin, identity)
}

/// Teacher dashboard.
pub async fn teacher_dashboard(RequireAuth(identity): RequireAuth) -> Response {
    dashboard_for(Role::Teacher, identity)
}

/// Student dashboard.
pub async fn student_dashboard(RequireAuth(identity): RequireAuth) -> Response {
    dashboard_for(Role::Student, identity)
}

/// The admin portal shell.
pub async fn admin_portal(RequireAdmin(identity): RequireAdmin) -> Json<AdminPortalView> {
    Json(AdminPortalView {
        user: UserInfo::from_identity(&identity),
        sections: admin_portal_sections(),
    })
}

fn dashboard_for(expected: Role, identity: ActiveIdentity) -> Response {
    let role = identity.role();
    if role != expected {
        return Redirect::to(role.dashboard_path()).into_response();
    }

    Json(DashboardView {
        user: UserInfo::from_identity(&identity),
        cards: nav_cards(role),
    })
    .into_response()
}

/// The navigation cards shown on each role's dashboard.
fn nav_cards(role: Role) -> Vec<NavCard> {
    match role {
        Role::Admin => vec![
            NavCard::new("Notifications", "Send and review school notifications", "/admin-portal/notifications"),
            NavCard::new("School settings", "Edit the public site content", "/admin-portal/school-settings"),
            NavCard::new("Users", "Manage staff and student accounts", "/admin-portal/users"),
            NavCard::new("Teams", "Organize classes and teams", "/admin-portal/teams"),
            NavCard::new("Exams", "Schedule and manage exams", "/admin-portal/exams"),
            NavCard::new("Results", "Publish and review results", "/admin-portal/results"),
        ],
        Role::Teacher => vec![
            NavCard::new("My teams", "Classes and teams you teach", "/teacher-dashboard/teams"),
            NavCard::new("Exams", "Exams for your classes", "/teacher-dashboard/exams"),
            NavCard::new("Results", "Enter and review results", "/teacher-dashboard/results"),
            NavCard::new("Notifications", "Messages from your school", "/teacher-dashboard/notifications"),
        ],
        Role::Student => vec![
            NavCard::new("My exams", "Upcoming exams", "/student-dashboard/exams"),
            NavCard::new("My results", "Published results", "/student-dashboard/results"),
            NavCard::new("Notifications", "Messages from your school", "/student-dashboard/notifications"),
        ],
    }
}

fn admin_portal_sections() -> Vec<NavCard> {
    nav_cards(Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_role_has_cards() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            assert!(!nav_cards(role).is_empty(), "role {role} has no cards");
        }
    }

    #[test]
    fn card_hrefs_are_unique_per_role() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            let cards = nav_cards(role);
            let hrefs: HashSet<_> = cards.iter().map(|c| c.href.as_str()).collect();
            assert_eq!(hrefs.len(), cards.len(), "duplicate hrefs for {role}");
        }
    }

    #[test]
    fn admin_cards_cover_the_admin_areas() {
        let cards = nav_cards(Role::Admin);
        let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
        for area in ["Notifications", "School settings", "Users", "Teams", "Exams", "Results"] {
            assert!(titles.contains(&area), "missing admin area {area}");
        }
    }

    #[test]
    fn no_data_page_serializes_with_status_tag() {
        let json = serde_json::to_string(&OrganizationPage::NoData).expect("serialize");
        assert_eq!(json, r#"{"status":"no_data"}"#);
    }
}
