//! Role-based dashboard routing

use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_DASHBOARD_PATH: &str = "/dashboard/admin";
pub const MENTOR_DASHBOARD_PATH: &str = "/dashboard/mentor";
pub const MEMBER_DASHBOARD_PATH: &str = "/dashboard/member";

/// Canonical dashboard for a role; anonymous users land on the login page
pub fn dashboard_path(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => ADMIN_DASHBOARD_PATH,
        Some(Role::Mentor) => MENTOR_DASHBOARD_PATH,
        Some(Role::Member) => MEMBER_DASHBOARD_PATH,
        None => LOGIN_PATH,
    }
}

/// Same as [`dashboard_path`] for a raw role string. Never fails.
pub fn dashboard_path_for(role: Option<&str>) -> &'static str {
    dashboard_path(role.and_then(Role::parse))
}
