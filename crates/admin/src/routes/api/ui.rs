//! UI state API handlers.

use axum::{Router, routing::post};
use serde::Serialize;
use tower_sessions::Session;

use tradepost_core::ActionError;

use crate::error::{ActionResponse, envelope};
use crate::middleware::{RequireAuth, toggle_sidebar};
use crate::state::AppState;

/// Build the UI state router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/ui/sidebar/toggle", post(toggle))
}

#[derive(Debug, Serialize)]
pub struct SidebarState {
    pub collapsed: bool,
}

/// Flip the sidebar for this session.
///
/// POST /api/ui/sidebar/toggle
pub async fn toggle(_auth: RequireAuth, session: Session) -> ActionResponse<SidebarState> {
    let result = toggle_sidebar(&session)
        .await
        .map(|ui| SidebarState {
            collapsed: ui.sidebar_collapsed,
        })
        .map_err(|e| {
            tracing::error!(error = %e, "failed to persist ui state");
            ActionError::internal()
        });
    envelope(result)
}
