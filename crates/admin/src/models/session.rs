//! Per-request identity and session-held UI state.

use serde::{Deserialize, Serialize};

use tradepost_core::{UserId, UserRole};

/// The authenticated user, decoded from the `token` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    #[must_use]
    pub fn can(&self, required: UserRole) -> bool {
        self.role.satisfies(required)
    }
}

/// Layout preferences kept in the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub sidebar_collapsed: bool,
}

impl UiState {
    /// Flip the sidebar and return the new state.
    #[must_use]
    pub const fn toggled_sidebar(self) -> Self {
        Self {
            sidebar_collapsed: !self.sidebar_collapsed,
        }
    }
}

/// Session keys.
pub mod session_keys {
    pub const UI_STATE: &str = "ui_state";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_state() {
        let ui = UiState::default();
        assert!(ui.toggled_sidebar().sidebar_collapsed);
        assert_eq!(ui.toggled_sidebar().toggled_sidebar(), ui);
    }

    #[test]
    fn role_checks() {
        let user = CurrentUser {
            id: UserId::new(1),
            username: "ops".to_string(),
            role: UserRole::Staff,
        };
        assert!(user.can(UserRole::Viewer));
        assert!(!user.can(UserRole::Admin));
    }
}
