//! Session tokens for scripts.
//!
//! ```bash
//! curl -b "token=$(tp-cli token issue -u dispatch)" http://127.0.0.1:3000/api/orders
//! ```
//!
//! Needs `JWT_SECRET` (and `JWT_EXPIRES_IN`) matching the server.

use tradepost_admin::config::AppConfig;
use tradepost_admin::db::UserRepository;
use tradepost_admin::models::CurrentUser;
use tradepost_admin::services::JwtService;

use super::{CliError, connect};

/// Sign a token for an active user without checking a password.
///
/// # Errors
///
/// Returns `CliError::Invalid` if the user does not exist or is inactive.
pub async fn issue(username: &str) -> Result<String, CliError> {
    let config = AppConfig::from_env()?;
    let pool = connect().await?;

    let credentials = UserRepository::new(&pool)
        .credentials_by_username(username)
        .await?
        .ok_or_else(|| CliError::Invalid(format!("no active user '{username}'")))?;

    let user = CurrentUser {
        id: credentials.user.id,
        username: credentials.user.username,
        role: credentials.user.role,
    };
    let jwt = JwtService::new(&config.jwt.secret, config.jwt.expires_in);
    let token = jwt.sign(&user)?;

    tracing::info!(
        user_id = %user.id,
        expires_in_secs = config.jwt.expires_in.as_secs(),
        "token issued"
    );
    Ok(token)
}
