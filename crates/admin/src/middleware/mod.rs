//! HTTP middleware stack.
//!
//! # Middleware order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (one span per request)
//! 3. Request id (`x-request-id`, generated when absent, recorded on the span)
//! 4. Security headers
//! 5. Session layer (UI state only)
//!
//! Authentication is not a layer: handlers opt in with the extractors in
//! [`auth`].

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    Admin, AuthRejection, OptionalAuth, RequireAuth, RequireRole, RequiredRole, Staff,
    TOKEN_COOKIE, clear_token_cookie, token_cookie, token_from_headers,
};
pub use request_id::{REQUEST_ID_HEADER, request_id};
pub use session::{create_session_layer, postgres_store, toggle_sidebar, ui_state};
