//! Integration tests for Tradepost.
//!
//! Every test is `#[ignore]`d: they need a migrated database and a running
//! server.
//!
//! ```bash
//! cargo run -p tradepost-cli -- migrate
//! cargo run -p tradepost-admin &
//! cargo test -p tradepost-integration-tests -- --ignored
//! ```
//!
//! - `TRADEPOST_BASE_URL` - server under test (default: `http://127.0.0.1:3000`)
//! - `DATABASE_URL` - the same database the server uses
//!
//! Fixtures are inserted straight into the database with names suffixed by a
//! random id, so runs do not collide.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use tradepost_admin::db::{UserRepository, create_pool};
use tradepost_admin::services::auth::hash_password;
use tradepost_core::{Email, UserRole};

const PASSWORD: &str = "integration password 42";

/// Server URL and database pool for one test.
pub struct TestContext {
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    pub async fn new() -> Self {
        let base_url = std::env::var("TRADEPOST_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = create_pool(&SecretString::from(database_url), 2)
            .await
            .expect("database connection");
        Self { base_url, pool }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Short random suffix for fixture names.
    #[must_use]
    pub fn unique(prefix: &str) -> String {
        format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..8])
    }

    /// Insert a user with `role` and return its username.
    pub async fn create_user(&self, role: UserRole) -> String {
        let username = Self::unique("it");
        let email = Email::parse(&format!("{username}@tradepost.test")).expect("email");
        let hash = hash_password(PASSWORD).expect("hash");
        UserRepository::new(&self.pool)
            .create(&username, &email, &hash, role)
            .await
            .expect("create user");
        username
    }

    /// A cookie-holding client logged in as a fresh user with `role`.
    pub async fn login(&self, role: UserRole) -> Client {
        let username = self.create_user(role).await;
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("client");
        let response = client
            .post(self.url("/auth/login"))
            .form(&[("username", username.as_str()), ("password", PASSWORD)])
            .send()
            .await
            .expect("login request");
        assert!(response.status().is_success(), "login failed: {}", response.status());
        client
    }

    /// GET `path` and decode the JSON envelope.
    pub async fn get_json(&self, client: &Client, path: &str) -> (u16, Value) {
        let response = client.get(self.url(path)).send().await.expect("request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    /// Insert a lookup row and return its id.
    pub async fn insert_lookup(&self, table: &str, name: &str) -> i32 {
        sqlx::query_scalar(&format!(
            "INSERT INTO shop.{table} (name) VALUES ($1) RETURNING id"
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .expect("insert lookup")
    }

    /// Insert a customer and return `(customer_id, document_number)`.
    pub async fn insert_customer(&self) -> (i32, String) {
        let document = Self::unique("doc");
        let person_id: i32 = sqlx::query_scalar(
            "INSERT INTO shop.person (document_number, first_name, last_name) \
             VALUES ($1, 'Integration', 'Customer') RETURNING id",
        )
        .bind(&document)
        .fetch_one(&self.pool)
        .await
        .expect("insert person");
        let id = sqlx::query_scalar("INSERT INTO shop.customer (person_id) VALUES ($1) RETURNING id")
            .bind(person_id)
            .fetch_one(&self.pool)
            .await
            .expect("insert customer");
        (id, document)
    }
}
