//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::StatsRepository;
use crate::db::stats::DashboardStats;
use crate::error::AppError;
use crate::filters;
use crate::format::format_money;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::LayoutView;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// One dashboard tile.
#[derive(Debug, Clone)]
pub struct MetricView {
    pub label: &'static str,
    pub value: String,
    pub href: &'static str,
}

impl MetricView {
    fn from_stats(stats: &DashboardStats) -> Vec<Self> {
        vec![
            Self {
                label: "Customers",
                value: stats.customers.to_string(),
                href: "/customers",
            },
            Self {
                label: "Active products",
                value: stats.products.to_string(),
                href: "/products",
            },
            Self {
                label: "Open orders",
                value: stats.open_orders.to_string(),
                href: "/orders?status=pending",
            },
            Self {
                label: "Shipments in transit",
                value: stats.shipments_in_transit.to_string(),
                href: "/shipments?status=in_transit",
            },
            Self {
                label: "Vehicles",
                value: stats.active_vehicles.to_string(),
                href: "/vehicles",
            },
            Self {
                label: "Revenue",
                value: format_money(stats.revenue),
                href: "/orders",
            },
        ]
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: LayoutView,
    pub metrics: Vec<MetricView>,
}

/// GET /
#[instrument(skip_all)]
async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate, AppError> {
    let stats = StatsRepository::new(state.pool()).dashboard().await?;
    Ok(DashboardTemplate {
        layout: LayoutView::new(&user, &session, "/").await,
        metrics: MetricView::from_stats(&stats),
    })
}

#[cfg(test)]
mod tests {
    use tradepost_core::Money;

    use super::*;

    #[test]
    fn revenue_is_formatted() {
        let stats = DashboardStats {
            open_orders: 4,
            revenue: Money::from_cents(1_234_500),
            ..DashboardStats::default()
        };
        let metrics = MetricView::from_stats(&stats);
        assert_eq!(metrics.len(), 6);
        assert_eq!(metrics[2].value, "4");
        assert_eq!(metrics[5].value, "$12,345.00");
    }
}
