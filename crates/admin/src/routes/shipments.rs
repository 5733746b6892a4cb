//! Shipment detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use tradepost_core::ShipmentId;

use crate::db::{Shipments, listing};
use crate::error::AppError;
use crate::filters;
use crate::format::format_optional_datetime;
use crate::middleware::RequireAuth;
use crate::models::Shipment;
use crate::state::AppState;

use super::LayoutView;

pub fn router() -> Router<AppState> {
    Router::new().route("/shipments/{id}", get(show))
}

/// Shipment view for templates; also used on the order page.
#[derive(Debug, Clone)]
pub struct ShipmentView {
    pub id: i32,
    pub order_id: i32,
    pub tracking_code: String,
    pub status: String,
    pub vehicle_id: Option<i32>,
    pub vehicle_plate: String,
    pub driver: String,
    pub shipped_at: String,
    pub delivered_at: String,
    pub deleted: bool,
}

impl From<&Shipment> for ShipmentView {
    fn from(s: &Shipment) -> Self {
        Self {
            id: s.id.as_i32(),
            order_id: s.order_id.as_i32(),
            tracking_code: s.tracking_code.clone(),
            status: s.status.to_string(),
            vehicle_id: s.vehicle_id.map(|id| id.as_i32()),
            vehicle_plate: s.vehicle_plate.clone().unwrap_or_else(|| "Unassigned".to_string()),
            driver: s.employee_name.clone().unwrap_or_else(|| "Unassigned".to_string()),
            shipped_at: format_optional_datetime(s.shipped_at),
            delivered_at: format_optional_datetime(s.delivered_at),
            deleted: s.is_delete,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "shipments/show.html")]
pub struct ShipmentShowTemplate {
    pub layout: LayoutView,
    pub shipment: ShipmentView,
}

/// GET /shipments/{id}
#[instrument(skip(user, state, session))]
async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ShipmentId>,
) -> Result<ShipmentShowTemplate, AppError> {
    let shipment = listing::find::<Shipments>(state.pool(), id.as_i32())
        .await
        .map_err(|e| AppError::from_repository(e, &format!("shipment {id}")))?;

    Ok(ShipmentShowTemplate {
        layout: LayoutView::new(&user, &session, &format!("/shipments/{id}")).await,
        shipment: ShipmentView::from(&shipment),
    })
}
