//! Authentication service.
//!
//! Username/password login against `shop.app_user`, returning a signed
//! session token. Token verification re-checks that the user is still active.

mod error;
mod jwt;
mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtService};
pub use password::{hash_password, reject_unknown_user, verify_password};

use sqlx::PgPool;

use crate::db::UserRepository;
use crate::models::CurrentUser;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt: &'a JwtService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt: &'a JwtService) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Check credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown or inactive
    /// username or a wrong password.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(CurrentUser, String), AuthError> {
        let Some(credentials) = self.users.credentials_by_username(username.trim()).await? else {
            tracing::info!("login for unknown username");
            return Err(reject_unknown_user(password));
        };

        verify_password(password, &credentials.password_hash)?;

        let user = CurrentUser {
            id: credentials.user.id,
            username: credentials.user.username,
            role: credentials.user.role,
        };
        let token = self.jwt.sign(&user)?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    /// Verify `token` and confirm its user is still active.
    ///
    /// The role comes from the database rather than the token, so demotions
    /// take effect before the token expires.
    ///
    /// # Errors
    ///
    /// Returns the token error from [`JwtService::verify`], or
    /// `AuthError::InactiveUser` if the account is gone.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.jwt.verify(token)?;
        let user = self
            .users
            .get_active(claims.user_id()?)
            .await?
            .ok_or(AuthError::InactiveUser)?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
