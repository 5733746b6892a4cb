//! HS256 session tokens.
//!
//! The token is the whole session: it carries the user id, username and role,
//! and is stored in the `token` cookie.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use tradepost_core::{UserId, UserRole};

use super::AuthError;
use crate::models::CurrentUser;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string. Registered claims must be strings for
    /// the `sub` presence check to accept them.
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// The user id carried in `sub`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if `sub` is not an integer id.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Signs and verifies session tokens with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &SecretString, expires_in: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            expires_in,
        }
    }

    /// Lifetime of issued tokens. Also used as the cookie `Max-Age`.
    #[must_use]
    pub const fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Issue a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn sign(&self, user: &CurrentUser) -> Result<String, AuthError> {
        self.sign_at(user, Utc::now().timestamp())
    }

    fn sign_at(&self, user: &CurrentUser, iat: i64) -> Result<String, AuthError> {
        let ttl = i64::try_from(self.expires_in.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id.as_i32().to_string(),
            username: user.username.clone(),
            role: user.role,
            iat,
            exp: iat.saturating_add(ttl),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::Signing)
    }

    /// Decode and validate `token`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for an expired token and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;
        claims.user_id()?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtService {
        JwtService::new(
            &SecretString::from(secret.to_string()),
            Duration::from_secs(3600),
        )
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(42),
            username: "dispatch".to_string(),
            role: UserRole::Staff,
        }
    }

    #[test]
    fn sign_then_verify() {
        let jwt = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        let token = jwt.sign(&user()).expect("sign");
        let claims = jwt.verify(&token).expect("verify");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().expect("id"), UserId::new(42));
        assert_eq!(claims.username, "dispatch");
        assert_eq!(claims.role, UserRole::Staff);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn issued_token_passes_required_claim_checks() {
        let jwt = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        let token = jwt.sign(&user()).expect("sign");
        let raw = jsonwebtoken::decode::<serde_json::Value>(
            &token,
            &jwt.decoding,
            &jwt.validation,
        )
        .expect("sub and exp present");
        assert_eq!(raw.claims["sub"], "42");
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let jwt = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "dispatch".to_string(),
            username: "dispatch".to_string(),
            role: UserRole::Staff,
            iat: now,
            exp: now + 600,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &jwt.encoding)
            .expect("encode");
        assert!(matches!(jwt.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        let issued = Utc::now().timestamp() - 7200;
        let token = jwt.sign_at(&user(), issued).expect("sign");
        assert!(matches!(jwt.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d")
            .sign(&user())
            .expect("sign");
        let other = service("zZ9!qQ8@wW7#eE6$rR5%tT4^yY3&uU2*");
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let jwt = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        assert!(matches!(jwt.verify("not.a.jwt"), Err(AuthError::InvalidToken)));
        assert!(matches!(jwt.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn debug_hides_keys() {
        let jwt = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        assert!(!format!("{jwt:?}").contains("aB3$"));
    }
}
