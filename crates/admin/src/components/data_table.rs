//! Data table component types.
//!
//! Every list page renders the same table template from a [`DataTableConfig`]
//! plus rows produced by the entity's [`TableView`] implementation.

use std::future::Future;

use serde::Serialize;
use sqlx::PgPool;

use crate::db::{Listable, RepositoryError};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    pub key: &'static str,
    pub label: &'static str,
    /// Right-aligned numeric column.
    pub numeric: bool,
}

impl TableColumn {
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: false,
        }
    }

    #[must_use]
    pub const fn numeric(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: true,
        }
    }
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

/// A `<select>` narrowing the listing; `key` is the query parameter.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
    /// Value currently applied, `""` for all.
    pub selected: String,
}

impl TableFilter {
    #[must_use]
    pub const fn select(key: &'static str, label: &'static str, options: Vec<FilterOption>) -> Self {
        Self {
            key,
            label,
            options,
            selected: String::new(),
        }
    }

    /// Mark the option matching the request's query value.
    #[must_use]
    pub fn with_selected(mut self, value: Option<&str>) -> Self {
        self.selected = value.unwrap_or_default().to_string();
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier, also the HTMX swap target.
    pub table_id: &'static str,
    pub columns: Vec<TableColumn>,
    pub search_placeholder: String,
    pub empty_title: String,
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    #[must_use]
    pub fn new(table_id: &'static str) -> Self {
        Self {
            table_id,
            columns: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }
}

/// One rendered table row.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub id: i32,
    /// Cell text in column order.
    pub cells: Vec<String>,
    /// Detail page, if the entity has one.
    pub href: Option<String>,
    /// Soft-deleted or disabled; shown only with "include inactive".
    pub inactive: bool,
}

/// How a listable entity appears as an HTML table.
pub trait TableView: Listable {
    /// Path of the list page.
    const PAGE_PATH: &'static str;

    fn config() -> DataTableConfig;

    fn row(item: &Self::Item) -> TableRow;

    /// Select filters for the entity's scope, options loaded from `pool`.
    fn filters(
        _pool: &PgPool,
    ) -> impl Future<Output = Result<Vec<TableFilter>, RepositoryError>> + Send {
        async { Ok(Vec::new()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_columns() {
        let config = DataTableConfig::new("vehicles")
            .column(TableColumn::new("plate", "Plate"))
            .column(TableColumn::numeric("capacity", "Capacity (kg)"))
            .search_placeholder("Search by plate...")
            .empty_state("No vehicles", Some("Try another search"));

        assert_eq!(config.columns.len(), 2);
        assert!(config.columns[1].numeric);
        assert_eq!(config.search_placeholder, "Search by plate...");
        assert_eq!(config.empty_description.as_deref(), Some("Try another search"));
    }

    #[test]
    fn filter_selection() {
        let filter = TableFilter::select(
            "status",
            "Status",
            vec![FilterOption::new("paid", "Paid")],
        )
        .with_selected(Some("paid"));
        assert_eq!(filter.selected, "paid");
        assert_eq!(
            TableFilter::select("status", "Status", vec![])
                .with_selected(None)
                .selected,
            ""
        );
    }
}
