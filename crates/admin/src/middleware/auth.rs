//! Authentication extractors.
//!
//! The session token lives in the `token` cookie. Pages redirect to the login
//! form when it is missing or invalid; `/api/` routes answer 401 with the JSON
//! envelope instead.

use std::marker::PhantomData;
use std::time::Duration;

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::cookie::{Cookie, SameSite, time};

use tradepost_core::{ErrorCode, Response as Envelope, UserRole};

use crate::error::set_sentry_user;
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Name of the cookie holding the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Read the session token from the request cookies.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == TOKEN_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// `Set-Cookie` value carrying a fresh token.
#[must_use]
pub fn token_cookie(token: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    let seconds = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(seconds))
        .secure(secure)
        .build()
}

/// `Set-Cookie` value that removes the token.
#[must_use]
pub fn clear_token_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .secure(secure)
        .build()
}

/// Error returned when a request is not allowed through.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Logged in but the role is too low.
    Forbidden,
}

impl AuthRejection {
    fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(Envelope::<()>::failure(
                    ErrorCode::Unauthorized,
                    "authentication required",
                )),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(Envelope::<()>::failure(
                    ErrorCode::Forbidden,
                    "insufficient permissions",
                )),
            )
                .into_response(),
        }
    }
}

/// Path as the client sent it. Nested routers see `parts.uri` with their
/// prefix stripped.
fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |original| original.0.path())
}

async fn current_user(parts: &Parts, state: &AppState) -> Option<CurrentUser> {
    let token = token_from_headers(&parts.headers)?;
    match AuthService::new(state.pool(), state.jwt())
        .authenticate(&token)
        .await
    {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!(error = %e, "rejected session token");
            None
        }
    }
}

/// Extractor that requires a logged-in user.
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user(parts, state)
            .await
            .ok_or_else(|| AuthRejection::for_path(request_path(parts)))?;
        set_sentry_user(user.id.as_i32(), &user.username);
        Ok(Self(user))
    }
}

/// Extractor that never rejects; `None` for anonymous visitors.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state).await))
    }
}

/// Minimum role for [`RequireRole`].
pub trait RequiredRole {
    const ROLE: UserRole;
}

/// Marker: staff or above.
pub struct Staff;

impl RequiredRole for Staff {
    const ROLE: UserRole = UserRole::Staff;
}

/// Marker: admins only.
pub struct Admin;

impl RequiredRole for Admin {
    const ROLE: UserRole = UserRole::Admin;
}

/// Extractor that requires a logged-in user with at least role `R`.
pub struct RequireRole<R: RequiredRole>(pub CurrentUser, PhantomData<R>);

impl<R: RequiredRole> RequireRole<R> {
    #[must_use]
    pub fn into_user(self) -> CurrentUser {
        self.0
    }
}

impl<R> FromRequestParts<AppState> for RequireRole<R>
where
    R: RequiredRole + Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.can(R::ROLE) {
            let required = R::ROLE;
            tracing::warn!(user_id = %user.id, %required, "role check failed");
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user, PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; id=1"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn token_cookie_attributes() {
        let cookie = token_cookie("t".into(), Duration::from_secs(3600), true).to_string();
        assert!(cookie.starts_with("token=t"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = clear_token_cookie(false).to_string();
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn api_paths_get_401_pages_get_redirect() {
        assert!(matches!(
            AuthRejection::for_path("/api/customers"),
            AuthRejection::Unauthorized
        ));
        assert!(matches!(
            AuthRejection::for_path("/customers"),
            AuthRejection::RedirectToLogin
        ));
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn nested_routes_use_the_original_path() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/search")
            .body(())
            .expect("request")
            .into_parts();
        assert_eq!(request_path(&parts), "/search");

        parts
            .extensions
            .insert(OriginalUri("/api/customers/search?q=ana".parse().expect("uri")));
        assert_eq!(request_path(&parts), "/api/customers/search");
        assert!(matches!(
            AuthRejection::for_path(request_path(&parts)),
            AuthRejection::Unauthorized
        ));
    }
}
