//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::JwtService;

/// Application state shared across all handlers.
///
/// Cloning is cheap: everything sits behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    jwt: JwtService,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.expires_in);
        Self {
            inner: Arc::new(AppStateInner { config, pool, jwt }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn jwt(&self) -> &JwtService {
        &self.inner.jwt
    }
}
