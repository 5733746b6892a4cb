//! `tp-cli` subcommands.

pub mod migrate;
pub mod token;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

use tradepost_admin::config::{ConfigError, DatabaseConfig};
use tradepost_admin::db::{self, RepositoryError};
use tradepost_admin::services::AuthError;

/// Errors surfaced by any command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Invalid(String),
}

/// Connect using `DATABASE_URL` or the `DB_*` parts.
async fn connect() -> Result<PgPool, CliError> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.url, 2).await?)
}
