//! Session layer for server-side UI state.
//!
//! Sessions hold layout preferences only (the sidebar); identity lives in the
//! `token` cookie. Production uses the `PostgreSQL` store in
//! `tower_sessions.session`, tests use `MemoryStore`.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time};
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::models::{UiState, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tp_session";

/// Session expiry on inactivity (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// `PostgreSQL` store over the migrated `tower_sessions.session` table.
///
/// # Errors
///
/// Returns the store's message if the schema or table name is rejected.
pub fn postgres_store(pool: &PgPool) -> Result<PostgresStore, String> {
    PostgresStore::new(pool.clone())
        .with_schema_name("tower_sessions")?
        .with_table_name("session")
}

/// Wrap `store` in a session manager with the app's cookie settings.
#[must_use]
pub fn create_session_layer<S>(store: S, secure: bool) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Current UI state; defaults when unset or unreadable.
pub async fn ui_state(session: &Session) -> UiState {
    session
        .get::<UiState>(session_keys::UI_STATE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Flip the sidebar and persist the result.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn toggle_sidebar(session: &Session) -> Result<UiState, tower_sessions::session::Error> {
    let next = ui_state(session).await.toggled_sidebar();
    session.insert(session_keys::UI_STATE, next).await?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn toggle_persists_in_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert!(!ui_state(&session).await.sidebar_collapsed);

        let after = toggle_sidebar(&session).await.expect("toggle");
        assert!(after.sidebar_collapsed);
        assert!(ui_state(&session).await.sidebar_collapsed);

        toggle_sidebar(&session).await.expect("toggle");
        assert!(!ui_state(&session).await.sidebar_collapsed);
    }
}
