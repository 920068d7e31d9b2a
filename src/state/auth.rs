//! Auth snapshot published to UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render from this plain value (mirrored into an `RwSignal` by
//! the app) instead of borrowing the session container directly.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::UserInfo;

/// Point-in-time view of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    pub user: Option<UserInfo>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub is_admin: bool,
}

impl AuthState {
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Name to greet the user with, if a profile is loaded.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(UserInfo::display_name)
    }
}
