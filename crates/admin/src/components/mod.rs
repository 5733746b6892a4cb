//! Reusable view components.

pub mod data_table;
pub mod tables;

pub use data_table::{DataTableConfig, FilterOption, TableColumn, TableFilter, TableRow, TableView};
