//! Login, logout and token verification.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use tradepost_core::{ErrorCode, Response as Envelope};

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, clear_token_cookie, token_cookie, token_from_headers};
use crate::services::{AuthError, AuthService, Claims};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", axum::routing::post(logout))
        .route("/api/auth/verify", get(verify))
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub error: Option<String>,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /auth/login
async fn login_page(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginPageTemplate {
        error: None,
        username: String::new(),
    }
    .into_response()
}

/// POST /auth/login
#[instrument(skip_all, fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.pool(), state.jwt())
        .login(&form.username, &form.password)
        .await
    {
        Ok((_user, token)) => {
            let cookie = token_cookie(
                token,
                state.jwt().expires_in(),
                state.config().secure_cookies(),
            );
            Ok((
                [(header::SET_COOKIE, cookie.to_string())],
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            LoginPageTemplate {
                error: Some("Invalid username or password".to_string()),
                username: form.username,
            },
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /auth/logout
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_token_cookie(state.config().secure_cookies());
    (
        [(header::SET_COOKIE, cookie.to_string())],
        Redirect::to("/auth/login"),
    )
}

/// GET /api/auth/verify
///
/// Checks the cookie token's signature and expiry only.
async fn verify(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let Some(token) = token_from_headers(&headers) else {
        return unauthorized("no session token");
    };

    match state.jwt().verify(&token) {
        Ok(claims) => (StatusCode::OK, Json(Envelope::ok(claims))),
        Err(e) => unauthorized(&e.to_string()),
    }
}

fn unauthorized(message: &str) -> (StatusCode, Json<Envelope<Claims>>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(Envelope::failure(ErrorCode::Unauthorized, message)),
    )
}
