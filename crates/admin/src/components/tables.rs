//! Table layouts for every entity with a list page.

use sqlx::PgPool;

use tradepost_core::{OrderStatus, Pagination, SearchTerm, ShipmentStatus};

use super::data_table::{DataTableConfig, FilterOption, TableColumn, TableFilter, TableRow, TableView};
use crate::db::lookups::{
    Categories, Colors, Sizes, VehicleDocumentTypes, VehicleStatuses, VehicleTypes,
};
use crate::db::{
    Cities, Countries, Customers, Employees, Listable, Orders, Products, Provinces,
    RepositoryError, Shipments, Users, Vehicles, listing,
};
use crate::format::{format_date, format_datetime, format_money, format_optional_datetime};

/// `in_transit` -> `In transit`
fn humanize(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn active_label(active: bool) -> String {
    if active { "active" } else { "inactive" }.to_string()
}

/// Options from the active rows of another listing, e.g. categories for products.
async fn options_from<L, F>(pool: &PgPool, option: F) -> Result<Vec<FilterOption>, RepositoryError>
where
    L: Listable,
    F: Fn(&L::Item) -> FilterOption + Send,
{
    let items = listing::search::<L>(
        pool,
        &SearchTerm::Empty,
        Pagination::MAX_LIMIT,
        &L::Scope::default(),
    )
    .await?;
    Ok(items.iter().map(option).collect())
}

impl TableView for Customers {
    const PAGE_PATH: &'static str = "/customers";

    fn config() -> DataTableConfig {
        DataTableConfig::new("customers")
            .column(TableColumn::numeric("id", "#"))
            .column(TableColumn::new("name", "Customer"))
            .column(TableColumn::new("document", "Document"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("phone", "Phone"))
            .column(TableColumn::new("since", "Customer since"))
            .search_placeholder("Search by name, document or email...")
            .empty_state("No customers found", Some("Try adjusting your search"))
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.id.to_string(),
                item.full_name(),
                item.document_number.clone(),
                item.email.as_ref().map(ToString::to_string).unwrap_or_default(),
                item.phone.clone().unwrap_or_default(),
                format_datetime(item.created_at),
            ],
            href: None,
            inactive: item.is_delete,
        }
    }
}

impl TableView for Employees {
    const PAGE_PATH: &'static str = "/employees";

    fn config() -> DataTableConfig {
        DataTableConfig::new("employees")
            .column(TableColumn::numeric("id", "#"))
            .column(TableColumn::new("name", "Employee"))
            .column(TableColumn::new("document", "Document"))
            .column(TableColumn::new("position", "Position"))
            .column(TableColumn::new("hired", "Hired"))
            .search_placeholder("Search by name, document or position...")
            .empty_state("No employees found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.id.to_string(),
                item.full_name(),
                item.document_number.clone(),
                item.position.clone(),
                format_date(item.hired_on),
            ],
            href: None,
            inactive: item.is_delete,
        }
    }
}

impl TableView for Users {
    const PAGE_PATH: &'static str = "/users";

    fn config() -> DataTableConfig {
        DataTableConfig::new("users")
            .column(TableColumn::numeric("id", "#"))
            .column(TableColumn::new("username", "Username"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("role", "Role"))
            .column(TableColumn::new("updated", "Last updated"))
            .search_placeholder("Search by username or email...")
            .empty_state("No users found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.id.to_string(),
                item.username.clone(),
                item.email.to_string(),
                humanize(item.role.as_str()),
                format_datetime(item.updated_at),
            ],
            href: None,
            inactive: !item.state,
        }
    }
}

impl TableView for Products {
    const PAGE_PATH: &'static str = "/products";

    fn config() -> DataTableConfig {
        DataTableConfig::new("products")
            .column(TableColumn::numeric("id", "#"))
            .column(TableColumn::new("name", "Product"))
            .column(TableColumn::new("category", "Category"))
            .column(TableColumn::numeric("price", "Base price"))
            .search_placeholder("Search products...")
            .empty_state("No products found", Some("Try another search or category"))
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.id.to_string(),
                item.name.clone(),
                item.category_name.clone(),
                format_money(item.base_price),
            ],
            href: Some(format!("/products/{}", item.id)),
            inactive: !item.state,
        }
    }

    async fn filters(pool: &PgPool) -> Result<Vec<TableFilter>, RepositoryError> {
        let categories =
            options_from::<Categories, _>(pool, |c| FilterOption::new(c.id, c.name.clone())).await?;
        Ok(vec![TableFilter::select("category_id", "Category", categories)])
    }
}

impl TableView for Orders {
    const PAGE_PATH: &'static str = "/orders";

    fn config() -> DataTableConfig {
        DataTableConfig::new("orders")
            .column(TableColumn::numeric("id", "#"))
            .column(TableColumn::new("customer", "Customer"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::numeric("total", "Total"))
            .column(TableColumn::new("ordered", "Ordered"))
            .search_placeholder("Search by order number or customer...")
            .empty_state("No orders found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.id.to_string(),
                item.customer_name.clone(),
                humanize(item.status.as_str()),
                format_money(item.total),
                format_datetime(item.ordered_at),
            ],
            href: Some(format!("/orders/{}", item.id)),
            inactive: item.is_delete,
        }
    }

    async fn filters(_pool: &PgPool) -> Result<Vec<TableFilter>, RepositoryError> {
        let statuses = OrderStatus::ALL
            .iter()
            .map(|s| FilterOption::new(s, humanize(s.as_str())))
            .collect();
        Ok(vec![TableFilter::select("status", "Status", statuses)])
    }
}

impl TableView for Shipments {
    const PAGE_PATH: &'static str = "/shipments";

    fn config() -> DataTableConfig {
        DataTableConfig::new("shipments")
            .column(TableColumn::new("tracking", "Tracking code"))
            .column(TableColumn::numeric("order", "Order"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("vehicle", "Vehicle"))
            .column(TableColumn::new("driver", "Driver"))
            .column(TableColumn::new("shipped", "Shipped"))
            .search_placeholder("Search by tracking code or plate...")
            .empty_state("No shipments found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.tracking_code.clone(),
                item.order_id.to_string(),
                humanize(item.status.as_str()),
                item.vehicle_plate.clone().unwrap_or_default(),
                item.employee_name.clone().unwrap_or_default(),
                format_optional_datetime(item.shipped_at),
            ],
            href: Some(format!("/shipments/{}", item.id)),
            inactive: item.is_delete,
        }
    }

    async fn filters(_pool: &PgPool) -> Result<Vec<TableFilter>, RepositoryError> {
        let statuses = ShipmentStatus::ALL
            .iter()
            .map(|s| FilterOption::new(s, humanize(s.as_str())))
            .collect();
        Ok(vec![TableFilter::select("status", "Status", statuses)])
    }
}

impl TableView for Vehicles {
    const PAGE_PATH: &'static str = "/vehicles";

    fn config() -> DataTableConfig {
        DataTableConfig::new("vehicles")
            .column(TableColumn::new("plate", "Plate"))
            .column(TableColumn::new("vehicle", "Vehicle"))
            .column(TableColumn::numeric("year", "Year"))
            .column(TableColumn::numeric("capacity", "Capacity (kg)"))
            .column(TableColumn::new("type", "Type"))
            .column(TableColumn::new("status", "Status"))
            .search_placeholder("Search by plate, brand or model...")
            .empty_state("No vehicles found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![
                item.plate.clone(),
                format!("{} {}", item.brand, item.model),
                item.year.to_string(),
                format!("{:.0}", item.capacity_kg),
                item.vehicle_type.clone(),
                item.vehicle_status.clone(),
            ],
            href: Some(format!("/vehicles/{}", item.id)),
            inactive: item.is_delete,
        }
    }

    async fn filters(pool: &PgPool) -> Result<Vec<TableFilter>, RepositoryError> {
        let types =
            options_from::<VehicleTypes, _>(pool, |t| FilterOption::new(t.id, t.name.clone()))
                .await?;
        let statuses =
            options_from::<VehicleStatuses, _>(pool, |s| FilterOption::new(s.id, s.name.clone()))
                .await?;
        Ok(vec![
            TableFilter::select("vehicle_type_id", "Type", types),
            TableFilter::select("vehicle_status_id", "Status", statuses),
        ])
    }
}

impl TableView for Countries {
    const PAGE_PATH: &'static str = "/geo/countries";

    fn config() -> DataTableConfig {
        DataTableConfig::new("countries")
            .column(TableColumn::new("name", "Country"))
            .column(TableColumn::new("iso", "ISO code"))
            .column(TableColumn::new("state", "State"))
            .search_placeholder("Search by name or ISO code...")
            .empty_state("No countries found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![item.name.clone(), item.iso_code.clone(), active_label(item.state)],
            href: Some(format!("/geo/provinces?country_id={}", item.id)),
            inactive: !item.state,
        }
    }
}

impl TableView for Provinces {
    const PAGE_PATH: &'static str = "/geo/provinces";

    fn config() -> DataTableConfig {
        DataTableConfig::new("provinces")
            .column(TableColumn::new("name", "Province"))
            .column(TableColumn::new("country", "Country"))
            .column(TableColumn::new("state", "State"))
            .search_placeholder("Search provinces...")
            .empty_state("No provinces found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![item.name.clone(), item.country_name.clone(), active_label(item.state)],
            href: Some(format!("/geo/cities?province_id={}", item.id)),
            inactive: !item.state,
        }
    }

    async fn filters(pool: &PgPool) -> Result<Vec<TableFilter>, RepositoryError> {
        let countries =
            options_from::<Countries, _>(pool, |c| FilterOption::new(c.id, c.name.clone())).await?;
        Ok(vec![TableFilter::select("country_id", "Country", countries)])
    }
}

impl TableView for Cities {
    const PAGE_PATH: &'static str = "/geo/cities";

    fn config() -> DataTableConfig {
        DataTableConfig::new("cities")
            .column(TableColumn::new("name", "City"))
            .column(TableColumn::new("province", "Province"))
            .column(TableColumn::new("state", "State"))
            .search_placeholder("Search cities...")
            .empty_state("No cities found", None)
    }

    fn row(item: &Self::Item) -> TableRow {
        TableRow {
            id: item.id.as_i32(),
            cells: vec![item.name.clone(), item.province_name.clone(), active_label(item.state)],
            href: None,
            inactive: !item.state,
        }
    }

    async fn filters(pool: &PgPool) -> Result<Vec<TableFilter>, RepositoryError> {
        let provinces = options_from::<Provinces, _>(pool, |p| {
            FilterOption::new(p.id, format!("{} ({})", p.name, p.country_name))
        })
        .await?;
        Ok(vec![TableFilter::select("province_id", "Province", provinces)])
    }
}

macro_rules! lookup_table_view {
    ($ty:ident, $path:literal, $label:literal) => {
        impl TableView for $ty {
            const PAGE_PATH: &'static str = $path;

            fn config() -> DataTableConfig {
                DataTableConfig::new(<$ty as Listable>::SLUG)
                    .column(TableColumn::numeric("id", "#"))
                    .column(TableColumn::new("name", $label))
                    .column(TableColumn::new("state", "State"))
                    .search_placeholder("Search by name...")
                    .empty_state("Nothing here yet", None)
            }

            fn row(item: &Self::Item) -> TableRow {
                TableRow {
                    id: item.id.as_i32(),
                    cells: vec![item.id.to_string(), item.name.clone(), active_label(item.state)],
                    href: None,
                    inactive: !item.state,
                }
            }
        }
    };
}

lookup_table_view!(Categories, "/settings/lookups/categories", "Category");
lookup_table_view!(Colors, "/settings/lookups/colors", "Color");
lookup_table_view!(Sizes, "/settings/lookups/sizes", "Size");
lookup_table_view!(VehicleTypes, "/settings/lookups/vehicle-types", "Vehicle type");
lookup_table_view!(VehicleStatuses, "/settings/lookups/vehicle-statuses", "Vehicle status");
lookup_table_view!(
    VehicleDocumentTypes,
    "/settings/lookups/vehicle-document-types",
    "Document type"
);

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tradepost_core::{CustomerId, Money, OrderId};

    use super::*;
    use crate::db::lookups::LookupKind;
    use crate::models::Order;

    #[test]
    fn humanize_statuses() {
        assert_eq!(humanize("in_transit"), "In transit");
        assert_eq!(humanize("paid"), "Paid");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn rows_match_columns() {
        let order = Order {
            id: OrderId::new(12),
            customer_id: CustomerId::new(3),
            customer_name: "Ana Ruiz".to_string(),
            status: OrderStatus::Shipped,
            total: Money::from_cents(125_000),
            ordered_at: Utc::now(),
            is_delete: true,
        };
        let row = Orders::row(&order);
        assert_eq!(row.cells.len(), Orders::config().columns.len());
        assert_eq!(row.cells[2], "Shipped");
        assert_eq!(row.cells[3], "$1,250.00");
        assert_eq!(row.href.as_deref(), Some("/orders/12"));
        assert!(row.inactive);
    }

    #[test]
    fn lookup_pages_live_under_settings() {
        for kind in LookupKind::ALL {
            let path = format!("/settings/lookups/{}", kind.slug());
            let known = [
                Categories::PAGE_PATH,
                Colors::PAGE_PATH,
                Sizes::PAGE_PATH,
                VehicleTypes::PAGE_PATH,
                VehicleStatuses::PAGE_PATH,
                VehicleDocumentTypes::PAGE_PATH,
            ];
            assert!(known.contains(&path.as_str()), "{path}");
        }
    }
}
