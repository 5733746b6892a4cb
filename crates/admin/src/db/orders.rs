//! Order repository.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use tradepost_core::{CustomerId, Money, OrderId, OrderStatus};

use super::RepositoryError;
use super::listing::{self, Filters, ListSpec, Listable, ScopeFilter, empty_as_none};
use super::shipments::{SHIPMENT_SELECT, ShipmentRow};
use crate::models::{Order, OrderDetail, OrderItem, Shipment};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    id: i32,
    customer_id: i32,
    customer_name: String,
    status: String,
    total: Money,
    ordered_at: DateTime<Utc>,
    is_delete: bool,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            customer_name: row.customer_name,
            status,
            total: row.total,
            ordered_at: row.ordered_at,
            is_delete: row.is_delete,
        })
    }
}

/// Order filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub customer_id: Option<CustomerId>,
}

impl ScopeFilter for OrderScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(status) = self.status {
            filters.and().push("o.status = ").push_bind(status.as_str());
        }
        if let Some(id) = self.customer_id {
            filters.and().push("o.customer_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Orders;

impl Listable for Orders {
    const ENTITY: &'static str = "order";
    const SLUG: &'static str = "orders";
    const TITLE: &'static str = "Orders";
    const TABLE: &'static str = "orders";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT o.id, o.customer_id, (p.first_name || ' ' || p.last_name) AS customer_name, \
                 o.status, o.total, o.ordered_at, o.is_delete \
                 FROM shop.orders o \
                 JOIN shop.customer c ON c.id = o.customer_id \
                 JOIN shop.person p ON p.id = c.person_id",
        count: "SELECT COUNT(*) FROM shop.orders o \
                JOIN shop.customer c ON c.id = o.customer_id \
                JOIN shop.person p ON p.id = c.person_id",
        id_column: "o.id",
        text_columns: &[
            "p.first_name",
            "p.last_name",
            "(p.first_name || ' ' || p.last_name)",
        ],
        active: Some("NOT o.is_delete"),
        order_by: "o.ordered_at DESC, o.id DESC",
    };
    const SOFT_DELETE: bool = true;

    type Row = OrderRow;
    type Item = Order;
    type Scope = OrderScope;

    fn convert(row: OrderRow) -> Result<Order, RepositoryError> {
        row.try_into()
    }
}

/// Repository for order detail views.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// An order with its lines and shipments.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn detail(&self, id: OrderId) -> Result<OrderDetail, RepositoryError> {
        let order = listing::find::<Orders>(self.pool, id.as_i32()).await?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT oi.id, oi.variant_id, v.sku, p.name AS product_name, oi.quantity, oi.unit_price \
             FROM shop.order_item oi \
             JOIN shop.product_variant v ON v.id = oi.variant_id \
             JOIN shop.product p ON p.id = v.product_id \
             WHERE oi.order_id = $1 \
             ORDER BY oi.id",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let sql = format!("{SHIPMENT_SELECT} WHERE s.order_id = $1 ORDER BY s.id");
        let shipments = sqlx::query_as::<_, ShipmentRow>(&sql)
            .bind(id.as_i32())
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Shipment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderDetail {
            order,
            items,
            shipments,
        })
    }
}
