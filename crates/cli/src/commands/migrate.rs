//! Database migrations.
//!
//! ```bash
//! tp-cli migrate
//! ```
//!
//! Runs every pending file in `crates/admin/migrations/`, including the
//! `tower_sessions.session` table used by the server.

use super::{CliError, connect};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
