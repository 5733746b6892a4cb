//! Back-office user management.
//!
//! ```bash
//! tp-cli user create -u dispatch -e dispatch@shop.example -p '…' -r staff
//! tp-cli user set-password -u dispatch -p '…'
//! ```

use tradepost_admin::db::UserRepository;
use tradepost_admin::services::auth::hash_password;
use tradepost_core::{Email, UserRole};

use super::{CliError, connect};

const MIN_PASSWORD_LENGTH: usize = 12;

fn check_password(password: &str) -> Result<(), CliError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CliError::Invalid(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn parse_inputs(username: &str, email: &str, role: &str) -> Result<(Email, UserRole), CliError> {
    if username.trim().is_empty() {
        return Err(CliError::Invalid("username cannot be empty".to_string()));
    }
    let email = Email::parse(email).map_err(|e| CliError::Invalid(format!("email: {e}")))?;
    let role = role
        .parse::<UserRole>()
        .map_err(|e| CliError::Invalid(e.to_string()))?;
    Ok((email, role))
}

/// Create a user and return its id.
///
/// # Errors
///
/// Returns `CliError::Invalid` for bad input and `CliError::Repository` if the
/// username or email is already taken.
pub async fn create(
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<i32, CliError> {
    let (email, role) = parse_inputs(username, email, role)?;
    check_password(password)?;

    let hash = hash_password(password)?;
    let pool = connect().await?;
    let user = UserRepository::new(&pool)
        .create(username, &email, &hash, role)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, %role, "user created");
    Ok(user.id.as_i32())
}

/// Replace an active user's password.
///
/// # Errors
///
/// Returns `CliError::Invalid` if the user does not exist or the password is too short.
pub async fn set_password(username: &str, password: &str) -> Result<(), CliError> {
    check_password(password)?;

    let pool = connect().await?;
    let users = UserRepository::new(&pool);
    let credentials = users
        .credentials_by_username(username)
        .await?
        .ok_or_else(|| CliError::Invalid(format!("no active user '{username}'")))?;

    let hash = hash_password(password)?;
    users.set_password_hash(credentials.user.id, &hash).await?;

    tracing::info!(user_id = %credentials.user.id, "password updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_are_validated_before_connecting() {
        assert!(parse_inputs("ops", "ops@shop.example", "staff").is_ok());
        assert!(matches!(parse_inputs(" ", "ops@shop.example", "staff"), Err(CliError::Invalid(_))));
        assert!(matches!(parse_inputs("ops", "nope", "staff"), Err(CliError::Invalid(_))));
        assert!(matches!(parse_inputs("ops", "ops@shop.example", "root"), Err(CliError::Invalid(_))));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_password("short").is_err());
        assert!(check_password("long enough password").is_ok());
    }
}
