//! Orders and order lines.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tradepost_core::{CustomerId, Money, OrderId, OrderItemId, OrderStatus, VariantId};

use super::Shipment;

/// An order (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total: Money,
    pub ordered_at: DateTime<Utc>,
    pub is_delete: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub variant_id: VariantId,
    pub sku: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Money,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// An order with its lines and shipments.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub shipments: Vec<Shipment>,
}

impl OrderDetail {
    /// Sum of line totals. Differs from `order.total` only if the stored
    /// total was edited by hand.
    #[must_use]
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_items_totals() {
        let item = |id, qty, cents| OrderItem {
            id: OrderItemId::new(id),
            variant_id: VariantId::new(1),
            sku: format!("SKU-{id}"),
            product_name: "Tee".to_string(),
            quantity: qty,
            unit_price: Money::from_cents(cents),
        };
        let detail = OrderDetail {
            order: Order {
                id: OrderId::new(1),
                customer_id: CustomerId::new(1),
                customer_name: "Ana Ruiz".to_string(),
                status: OrderStatus::Paid,
                total: Money::from_cents(3500),
                ordered_at: Utc::now(),
                is_delete: false,
            },
            items: vec![item(1, 2, 1000), item(2, 1, 1500)],
            shipments: vec![],
        };

        assert_eq!(detail.items[0].line_total(), Money::from_cents(2000));
        assert_eq!(detail.items_total(), detail.order.total);
    }
}
