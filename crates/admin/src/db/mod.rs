//! Database access for the `shop` schema.
//!
//! # Tables
//!
//! - Geography: `country`, `province`, `city`, `address`
//! - People: `person`, `app_user`, `customer`, `employee`
//! - Catalog: `category`, `color`, `size`, `product`, `product_variant`
//! - Sales: `orders`, `order_item`
//! - Fleet: `vehicle_type`, `vehicle_status`, `vehicle_document_type`,
//!   `vehicle`, `vehicle_document`
//! - Logistics: `shipment`
//! - `tower_sessions.session` - UI state sessions
//!
//! Listing, search and term lookup go through the generic helpers in
//! [`listing`]; hard deletes go through [`guard`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p tradepost-cli -- migrate
//! ```

pub mod customers;
pub mod employees;
pub mod geography;
pub mod guard;
pub mod listing;
pub mod lookups;
pub mod orders;
pub mod products;
pub mod shipments;
pub mod stats;
pub mod users;
pub mod vehicles;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use tradepost_core::ActionError;

pub use customers::Customers;
pub use employees::Employees;
pub use geography::{Cities, Countries, Provinces};
pub use listing::{ListQuery, Listable};
pub use lookups::LookupKind;
pub use orders::{OrderRepository, Orders};
pub use products::{ProductRepository, Products, Variants};
pub use shipments::Shipments;
pub use stats::StatsRepository;
pub use users::{UserRepository, Users};
pub use vehicles::{VehicleRepository, Vehicles};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A hard delete was refused because other rows reference the target.
    #[error("{entity} is referenced by {count} {relation}")]
    HasDependents {
        entity: &'static str,
        relation: &'static str,
        count: i64,
    },
}

impl RepositoryError {
    /// Convert into the action-level error, naming `entity` for not-found cases.
    ///
    /// Database and corruption details are logged here and replaced by a
    /// generic message.
    #[must_use]
    pub fn into_action(self, entity: &str) -> ActionError {
        match self {
            Self::NotFound => ActionError::not_found(entity),
            Self::Conflict(msg) => ActionError::conflict(msg),
            Self::HasDependents {
                entity,
                relation,
                count,
            } => ActionError::has_dependents(entity, relation, count),
            Self::Database(_) | Self::DataCorruption(_) => {
                tracing::error!(error = %self, entity, "repository failure");
                ActionError::internal()
            }
        }
    }
}

impl From<RepositoryError> for ActionError {
    fn from(err: RepositoryError) -> Self {
        err.into_action("record")
    }
}

/// Map unique violations to [`RepositoryError::Conflict`].
pub(crate) fn map_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_string());
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool.
///
/// The pool is created once at startup and shared through `AppState`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use tradepost_core::ErrorCode;

    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err = RepositoryError::NotFound.into_action("vehicle");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "vehicle not found");
    }

    #[test]
    fn dependents_become_conflicts() {
        let err = RepositoryError::HasDependents {
            entity: "size",
            relation: "product variants",
            count: 2,
        }
        .into_action("size");
        assert!(err.is_conflict());
        assert!(err.message.contains("2 product variants"));
    }

    #[test]
    fn database_details_are_hidden() {
        let err: ActionError = RepositoryError::DataCorruption("bad status 'x'".into()).into();
        assert!(err.is_internal());
        assert!(!err.message.contains("bad status"));
    }
}
