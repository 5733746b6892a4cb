//! JSON API handlers.
//!
//! Every response is the [`tradepost_core::Response`] envelope.

pub mod resources;
pub mod ui;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(resources::router())
        .merge(ui::router())
}
