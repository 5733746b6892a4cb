//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username, inactive account or wrong password.
    ///
    /// The three cases share one variant so responses cannot be used to
    /// probe for usernames.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Token `exp` is in the past.
    #[error("token expired")]
    TokenExpired,

    /// Signature, algorithm or structure is wrong.
    #[error("invalid token")]
    InvalidToken,

    /// The token's user no longer exists or was deactivated.
    #[error("user is no longer active")]
    InactiveUser,

    /// Argon2 failure other than a mismatch.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether the caller should be treated as unauthenticated (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::TokenExpired | Self::InvalidToken | Self::InactiveUser
        )
    }
}
