//! Order detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use tradepost_core::OrderId;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::filters;
use crate::format::{format_datetime, format_money};
use crate::middleware::RequireAuth;
use crate::models::{OrderDetail, OrderItem};
use crate::state::AppState;

use super::LayoutView;
use super::shipments::ShipmentView;

pub fn router() -> Router<AppState> {
    Router::new().route("/orders/{id}", get(show))
}

/// Order line view for templates.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub sku: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            sku: item.sku.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: format_money(item.unit_price),
            line_total: format_money(item.line_total()),
        }
    }
}

/// Order view for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub customer_name: String,
    pub status: String,
    pub is_final: bool,
    pub total: String,
    pub items_total: String,
    /// Stored total differs from the sum of the lines.
    pub total_mismatch: bool,
    pub ordered_at: String,
    pub deleted: bool,
    pub items: Vec<OrderItemView>,
    pub shipments: Vec<ShipmentView>,
}

impl From<&OrderDetail> for OrderView {
    fn from(detail: &OrderDetail) -> Self {
        let order = &detail.order;
        let items_total = detail.items_total();
        Self {
            id: order.id.as_i32(),
            customer_name: order.customer_name.clone(),
            status: order.status.to_string(),
            is_final: order.status.is_final(),
            total: format_money(order.total),
            items_total: format_money(items_total),
            total_mismatch: !detail.items.is_empty() && items_total != order.total,
            ordered_at: format_datetime(order.ordered_at),
            deleted: order.is_delete,
            items: detail.items.iter().map(OrderItemView::from).collect(),
            shipments: detail.shipments.iter().map(ShipmentView::from).collect(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: LayoutView,
    pub order: OrderView,
}

/// GET /orders/{id}
#[instrument(skip(user, state, session))]
async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> Result<OrderShowTemplate, AppError> {
    let detail = OrderRepository::new(state.pool())
        .detail(id)
        .await
        .map_err(|e| AppError::from_repository(e, &format!("order {id}")))?;

    Ok(OrderShowTemplate {
        layout: LayoutView::new(&user, &session, &format!("/orders/{id}")).await,
        order: OrderView::from(&detail),
    })
}
