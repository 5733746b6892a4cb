//! Guarded hard deletes and soft delete toggles.

use reqwest::StatusCode;
use tradepost_core::UserRole;
use tradepost_integration_tests::TestContext;

#[tokio::test]
#[ignore = "requires running server and database"]
async fn referenced_lookup_is_not_deleted() {
    let ctx = TestContext::new().await;
    let category = ctx.insert_lookup("category", &TestContext::unique("Outerwear")).await;
    sqlx::query(
        "INSERT INTO shop.product (category_id, name, base_price) VALUES ($1, 'Parka', 120)",
    )
    .bind(category)
    .execute(&ctx.pool)
    .await
    .expect("insert product");

    let client = ctx.login(UserRole::Admin).await;
    let response = client
        .delete(ctx.url(&format!("/api/categories/{category}")))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["code"], 409);

    let still_there: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shop.category WHERE id = $1)")
            .bind(category)
            .fetch_one(&ctx.pool)
            .await
            .expect("exists");
    assert!(still_there);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn unreferenced_lookup_is_deleted_by_admin_only() {
    let ctx = TestContext::new().await;
    let size = ctx.insert_lookup("size", &TestContext::unique("XXS")).await;
    let path = ctx.url(&format!("/api/sizes/{size}"));

    let staff = ctx.login(UserRole::Staff).await;
    let response = staff.delete(&path).send().await.expect("request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = ctx.login(UserRole::Admin).await;
    let response = admin.delete(&path).send().await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["hx-trigger"].to_str().expect("ascii"),
        "table-changed"
    );

    let response = admin.delete(&path).send().await.expect("request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn deactivated_customer_leaves_default_listing() {
    let ctx = TestContext::new().await;
    let (id, document) = ctx.insert_customer().await;
    let client = ctx.login(UserRole::Staff).await;

    let response = client
        .post(ctx.url(&format!("/api/customers/{id}/deactivate")))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, hidden) = ctx
        .get_json(&client, &format!("/api/customers?q={document}"))
        .await;
    assert_eq!(hidden["data"].as_array().expect("array").len(), 0);

    let (_, shown) = ctx
        .get_json(&client, &format!("/api/customers?q={document}&include_inactive=true"))
        .await;
    assert_eq!(shown["data"][0]["id"], id);

    client
        .post(ctx.url(&format!("/api/customers/{id}/restore")))
        .send()
        .await
        .expect("restore");
    let (_, restored) = ctx
        .get_json(&client, &format!("/api/customers?q={document}"))
        .await;
    assert_eq!(restored["data"][0]["id"], id);
}
