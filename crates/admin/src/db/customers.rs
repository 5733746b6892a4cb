//! Customer listing.

use chrono::{DateTime, Utc};

use tradepost_core::{CustomerId, Email, PersonId};

use super::RepositoryError;
use super::listing::{ListSpec, Listable, NoScope};
use crate::models::Customer;

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
pub struct CustomerRow {
    id: i32,
    person_id: i32,
    document_number: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    is_delete: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = parse_optional_email(row.email.as_deref())?;

        Ok(Self {
            id: CustomerId::new(row.id),
            person_id: PersonId::new(row.person_id),
            document_number: row.document_number,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone: row.phone,
            is_delete: row.is_delete,
            created_at: row.created_at,
        })
    }
}

/// Empty strings in `person.email` are treated as "no email".
pub(crate) fn parse_optional_email(raw: Option<&str>) -> Result<Option<Email>, RepositoryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Email::parse(value).map(Some).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        }),
    }
}

pub struct Customers;

impl Listable for Customers {
    const ENTITY: &'static str = "customer";
    const SLUG: &'static str = "customers";
    const TITLE: &'static str = "Customers";
    const TABLE: &'static str = "customer";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT c.id, c.person_id, p.document_number, p.first_name, p.last_name, \
                 p.email, p.phone, c.is_delete, c.created_at \
                 FROM shop.customer c JOIN shop.person p ON p.id = c.person_id",
        count: "SELECT COUNT(*) FROM shop.customer c JOIN shop.person p ON p.id = c.person_id",
        id_column: "c.id",
        text_columns: &[
            "p.first_name",
            "p.last_name",
            "(p.first_name || ' ' || p.last_name)",
            "p.document_number",
            "p.email",
        ],
        active: Some("NOT c.is_delete"),
        order_by: "p.last_name, p.first_name, c.id",
    };
    const SOFT_DELETE: bool = true;

    type Row = CustomerRow;
    type Item = Customer;
    type Scope = NoScope;

    fn convert(row: CustomerRow) -> Result<Customer, RepositoryError> {
        row.try_into()
    }
}
