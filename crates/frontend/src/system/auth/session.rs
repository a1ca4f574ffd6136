use contracts::system::auth::{CurrentUser, RoleName};

use super::storage;

/// Page the login form lives on.
pub const LOGIN_PAGE: &str = "index.html";

/// Authenticated user as seen by every dashboard.
///
/// Built once from `/users/me` and handed to dashboards as a prop; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    user: CurrentUser,
}

impl SessionContext {
    pub fn new(user: CurrentUser) -> Self {
        Self { user }
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn full_name(&self) -> &str {
        &self.user.full_name
    }

    pub fn role(&self) -> RoleName {
        self.user.role_name.unwrap_or(RoleName::Unknown)
    }

    pub fn faculty_id(&self) -> Option<i64> {
        self.user.faculty_id
    }

    pub fn faculty_name(&self) -> Option<&str> {
        self.user.faculty_name.as_deref()
    }

    /// Rows of the profile modal, optional fields only when present.
    pub fn profile_rows(&self) -> Vec<(&'static str, String)> {
        let u = &self.user;
        let mut rows = vec![
            ("ID", u.id.to_string()),
            ("Логин", u.login.clone()),
            ("ФИО", u.full_name.clone()),
            ("Email", u.email.clone().unwrap_or_else(|| "—".to_string())),
            ("Роль", self.role().label().to_string()),
            ("Статус", u.status.clone().unwrap_or_else(|| "—".to_string())),
        ];
        if let Some(f) = &u.faculty_name {
            rows.push(("Факультет", f.clone()));
        }
        if let Some(g) = &u.group_name {
            rows.push(("Группа", g.clone()));
        }
        if let Some(s) = &u.specialty_name {
            rows.push(("Специальность", s.clone()));
        }
        rows
    }
}

/// Drop the token and go back to the login page.
pub fn teardown() {
    log::warn!("Session ended, redirecting to {}", LOGIN_PAGE);
    storage::clear_token();
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(LOGIN_PAGE);
    }
}

/// Logout button handler
pub fn logout() {
    log::info!("User logged out");
    teardown();
}
