//! Customers, employees and back-office users.
//!
//! Customers and employees share a `person` row; these types flatten it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use tradepost_core::{CustomerId, Email, EmployeeId, PersonId, UserId, UserRole};

/// A customer (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub person_id: PersonId,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub is_delete: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An employee (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub person_id: PersonId,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<Email>,
    pub position: String,
    pub hired_on: NaiveDate,
    pub is_delete: bool,
}

impl Employee {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A back-office user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub role: UserRole,
    pub state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login lookup result: the user plus the stored hash.
///
/// Only the login handler and the CLI see this type.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}
