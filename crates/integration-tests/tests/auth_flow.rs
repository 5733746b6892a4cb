//! Login, token verification and logout against a running server.

use reqwest::{Client, StatusCode};
use tradepost_core::UserRole;
use tradepost_integration_tests::TestContext;

#[tokio::test]
#[ignore = "requires running server and database"]
async fn login_sets_cookie_that_verifies() {
    let ctx = TestContext::new().await;
    let client = ctx.login(UserRole::Staff).await;

    let (status, body) = ctx.get_json(&client, "/api/auth/verify").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "staff");
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn wrong_password_rerenders_login() {
    let ctx = TestContext::new().await;
    let username = ctx.create_user(UserRole::Viewer).await;

    let response = Client::new()
        .post(ctx.url("/auth/login"))
        .form(&[("username", username.as_str()), ("password", "not the password")])
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = response.text().await.expect("body");
    assert!(html.contains("Invalid username or password"));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn logout_ends_the_session() {
    let ctx = TestContext::new().await;
    let client = ctx.login(UserRole::Staff).await;

    client
        .post(ctx.url("/auth/logout"))
        .send()
        .await
        .expect("logout");

    let (status, body) = ctx.get_json(&client, "/api/auth/verify").await;
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);
}
