//! Employee listing.

use chrono::NaiveDate;

use tradepost_core::{EmployeeId, PersonId};

use super::RepositoryError;
use super::customers::parse_optional_email;
use super::listing::{ListSpec, Listable, NoScope};
use crate::models::Employee;

/// Internal row type for employee queries.
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRow {
    id: i32,
    person_id: i32,
    document_number: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    position: String,
    hired_on: NaiveDate,
    is_delete: bool,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepositoryError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmployeeId::new(row.id),
            person_id: PersonId::new(row.person_id),
            document_number: row.document_number,
            first_name: row.first_name,
            last_name: row.last_name,
            email: parse_optional_email(row.email.as_deref())?,
            position: row.position,
            hired_on: row.hired_on,
            is_delete: row.is_delete,
        })
    }
}

pub struct Employees;

impl Listable for Employees {
    const ENTITY: &'static str = "employee";
    const SLUG: &'static str = "employees";
    const TITLE: &'static str = "Employees";
    const TABLE: &'static str = "employee";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT e.id, e.person_id, p.document_number, p.first_name, p.last_name, \
                 p.email, e.position, e.hired_on, e.is_delete \
                 FROM shop.employee e JOIN shop.person p ON p.id = e.person_id",
        count: "SELECT COUNT(*) FROM shop.employee e JOIN shop.person p ON p.id = e.person_id",
        id_column: "e.id",
        text_columns: &[
            "p.first_name",
            "p.last_name",
            "(p.first_name || ' ' || p.last_name)",
            "p.document_number",
            "e.position",
        ],
        active: Some("NOT e.is_delete"),
        order_by: "p.last_name, p.first_name, e.id",
    };
    const SOFT_DELETE: bool = true;

    type Row = EmployeeRow;
    type Item = Employee;
    type Scope = NoScope;

    fn convert(row: EmployeeRow) -> Result<Employee, RepositoryError> {
        row.try_into()
    }
}
