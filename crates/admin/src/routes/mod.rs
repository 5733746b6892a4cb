//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Database ping
//!
//! GET  /auth/login                  - Login page
//! POST /auth/login                  - Password login, sets the `token` cookie
//! POST /auth/logout                 - Clears the cookie
//!
//! GET  /                            - Dashboard
//! GET  /{entity}                    - List page (HTMX requests get the table only)
//! GET  /products/{id}               - Product with variants
//! GET  /orders/{id}                 - Order with items and shipments
//! GET  /shipments/{id}              - Shipment
//! GET  /vehicles/{id}               - Vehicle with documents
//! GET  /settings/lookups            - Lookup table index
//! GET  /settings/lookups/{kind}     - Lookup table list page
//!
//! GET  /catalog                     - Public product browsing
//! GET  /catalog/{id}                - Public product page
//!
//! GET  /api/{entity}                - Paginated listing
//! GET  /api/{entity}/search         - Up to `limit` matches
//! GET  /api/{entity}/by-term        - First match
//! GET  /api/{entity}/{id}           - One row
//! DELETE /api/{entity}/{id}         - Guarded delete (lookups, products, variants)
//! POST /api/{entity}/{id}/deactivate|restore - Soft delete toggles
//! GET  /api/auth/verify             - Token check
//! POST /api/ui/sidebar/toggle       - Flip the sidebar
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod resources;
pub mod settings;
pub mod shipments;
pub mod vehicles;

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use tower_sessions::Session;

use crate::middleware::ui_state;
use crate::models::CurrentUser;
use crate::state::AppState;

use tradepost_core::UserRole;

/// Build the application router (without global layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(resources::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(shipments::router())
        .merge(vehicles::router())
        .merge(settings::router())
        .merge(catalog::router())
        .merge(api::router())
}

/// Data every authenticated page passes to `base.html`.
#[derive(Debug, Clone)]
pub struct LayoutView {
    pub username: String,
    pub role: String,
    pub is_admin: bool,
    pub sidebar_collapsed: bool,
    pub current_path: String,
}

impl LayoutView {
    pub async fn new(user: &CurrentUser, session: &Session, current_path: &str) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.to_string(),
            is_admin: user.can(UserRole::Admin),
            sidebar_collapsed: ui_state(session).await.sidebar_collapsed,
            current_path: current_path.to_string(),
        }
    }

    /// Whether the nav entry for `prefix` is the current section.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            return self.current_path == "/";
        }
        self.current_path == prefix
            || self
                .current_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

fn header_is_true(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Whether the request came from HTMX and wants a fragment.
///
/// History restores come from HTMX too but replace the whole body, so they get
/// the full page.
#[must_use]
pub fn wants_fragment(headers: &HeaderMap) -> bool {
    header_is_true(headers, "hx-request") && !header_is_true(headers, "hx-history-restore-request")
}

/// Mark a response whose body depends on `HX-Request` so caches keep the page
/// and the fragment apart.
#[must_use]
pub fn vary_on_htmx(mut response: Response) -> Response {
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("HX-Request"));
    response
}
