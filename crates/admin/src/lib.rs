//! Tradepost admin library.
//!
//! Server-rendered back office for the `shop` database: listings with search
//! and pagination, detail pages, guarded deletes, JWT cookie login and a
//! public product catalog. The binary in `main.rs` only loads configuration,
//! sets up tracing and Sentry, and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod format;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::http::{Request, Response};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::state::AppState;

/// Static assets shipped with the crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// The full application: routes, static files and every layer except Sentry.
///
/// `store` backs the UI-state sessions (`PostgresStore` in production,
/// `MemoryStore` in tests).
pub fn app<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer =
        middleware::create_session_layer(store, state.config().secure_cookies());

    let router = routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer);

    middleware::security_headers::apply(router)
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use tradepost_core::{UserId, UserRole};

    use super::*;
    use crate::config::AppConfig;
    use crate::models::CurrentUser;

    const SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d";

    /// State over a pool that never connects; only routes that skip the
    /// database can succeed.
    fn state() -> AppState {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://tradepost@127.0.0.1:1/tradepost"),
            ("JWT_SECRET", SECRET),
            ("APP_ENV", "test"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(ToString::to_string))
            .expect("config");
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://tradepost@127.0.0.1:1/tradepost")
            .expect("lazy pool");
        AppState::new(config, pool)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf-8")
    }

    #[tokio::test]
    async fn health_is_ok_with_request_id() {
        let response = app(state(), MemoryStore::default())
            .oneshot(get("/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn login_page_renders() {
        let response = app(state(), MemoryStore::default())
            .oneshot(get("/auth/login"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("name=\"username\""));
        assert!(html.contains("action=\"/auth/login\""));
    }

    #[tokio::test]
    async fn pages_redirect_to_login_without_token() {
        for uri in ["/", "/orders", "/vehicles/3", "/settings/lookups"] {
            let response = app(state(), MemoryStore::default())
                .oneshot(get(uri))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/auth/login", "{uri}");
        }
    }

    #[tokio::test]
    async fn api_answers_401_envelope_without_token() {
        let response = app(state(), MemoryStore::default())
            .oneshot(get("/api/customers"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json");
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], 401);
    }

    #[tokio::test]
    async fn nested_api_actions_answer_401_not_redirect() {
        let requests = [
            ("GET", "/api/customers/search?q=ana"),
            ("GET", "/api/products/by-term?q=shirt"),
            ("GET", "/api/vehicles/3"),
            ("DELETE", "/api/categories/3"),
            ("POST", "/api/customers/3/deactivate"),
        ];
        for (method, uri) in requests {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request");
            let response = app(state(), MemoryStore::default())
                .oneshot(request)
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn verify_rejects_missing_and_forged_tokens() {
        let response = app(state(), MemoryStore::default())
            .oneshot(get("/api/auth/verify"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/api/auth/verify")
            .header(header::COOKIE, "token=not.a.jwt")
            .body(Body::empty())
            .expect("request");
        let response = app(state(), MemoryStore::default())
            .oneshot(request)
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn verify_returns_claims_for_signed_token() {
        let state = state();
        let token = state
            .jwt()
            .sign(&CurrentUser {
                id: UserId::new(7),
                username: "dispatch".to_string(),
                role: UserRole::Staff,
            })
            .expect("sign");

        let request = Request::builder()
            .uri("/api/auth/verify")
            .header(header::COOKIE, format!("theme=dark; token={token}"))
            .body(Body::empty())
            .expect("request");
        let response = app(state, MemoryStore::default())
            .oneshot(request)
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["sub"], "7");
        assert_eq!(json["data"]["username"], "dispatch");
        assert_eq!(json["data"]["role"], "staff");
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .expect("request");
        let response = app(state(), MemoryStore::default())
            .oneshot(request)
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers()[header::SET_COOKIE].to_str().expect("ascii");
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("Max-Age=0"));
    }
}
