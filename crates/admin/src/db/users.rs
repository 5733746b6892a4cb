//! Back-office user repository.
//!
//! The listing never selects `password_hash`; only
//! [`UserRepository::credentials_by_username`] reads it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tradepost_core::{Email, UserId, UserRole};

use super::listing::{ListSpec, Listable, NoScope};
use super::{RepositoryError, map_unique};
use crate::models::{User, UserCredentials};

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.role, u.state, u.created_at, u.updated_at";

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    id: i32,
    username: String,
    email: String,
    role: String,
    state: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            email,
            role,
            state: row.state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

pub struct Users;

impl Listable for Users {
    const ENTITY: &'static str = "user";
    const SLUG: &'static str = "users";
    const TITLE: &'static str = "Users";
    const TABLE: &'static str = "app_user";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT u.id, u.username, u.email, u.role, u.state, u.created_at, u.updated_at \
                 FROM shop.app_user u",
        count: "SELECT COUNT(*) FROM shop.app_user u",
        id_column: "u.id",
        text_columns: &["u.username", "u.email"],
        active: Some("u.state"),
        order_by: "u.username",
    };

    type Row = UserRow;
    type Item = User;
    type Scope = NoScope;

    fn convert(row: UserRow) -> Result<User, RepositoryError> {
        row.try_into()
    }
}

/// Repository for user authentication and management.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an active user and their password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, u.password_hash FROM shop.app_user u \
             WHERE lower(u.username) = lower($1) AND u.state"
        );
        let row = sqlx::query_as::<_, CredentialsRow>(&sql)
            .bind(username.trim())
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| {
            Ok(UserCredentials {
                user: r.user.try_into()?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    /// Get an active user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM shop.app_user u WHERE u.id = $1 AND u.state");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.app_user AS u (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.trim())
            .bind(email.as_str())
            .bind(password_hash)
            .bind(role.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique(e, "username or email already in use"))?;

        row.try_into()
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.app_user SET password_hash = $1, updated_at = now() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str) -> UserRow {
        UserRow {
            id: 1,
            username: "ops".to_string(),
            email: "ops@tradepost.dev".to_string(),
            role: role.to_string(),
            state: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn parses_role_column() {
        let user = User::try_from(row("staff")).ok();
        assert_eq!(user.map(|u| u.role), Some(UserRole::Staff));
    }

    #[test]
    fn unknown_role_is_corruption() {
        assert!(matches!(
            User::try_from(row("root")),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn listing_never_selects_the_hash() {
        assert!(!Users::SPEC.select.contains("password_hash"));
    }
}
