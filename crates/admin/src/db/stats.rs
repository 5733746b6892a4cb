//! Dashboard counters.

use serde::Serialize;
use sqlx::PgPool;

use tradepost_core::Money;

use super::RepositoryError;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct DashboardStats {
    pub customers: i64,
    pub products: i64,
    pub open_orders: i64,
    pub shipments_in_transit: i64,
    pub active_vehicles: i64,
    pub revenue: Money,
}

pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All counters in one round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard(&self) -> Result<DashboardStats, RepositoryError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            "SELECT \
               (SELECT COUNT(*) FROM shop.customer WHERE NOT is_delete) AS customers, \
               (SELECT COUNT(*) FROM shop.product WHERE state) AS products, \
               (SELECT COUNT(*) FROM shop.orders \
                  WHERE NOT is_delete AND status IN ('pending', 'paid')) AS open_orders, \
               (SELECT COUNT(*) FROM shop.shipment \
                  WHERE NOT is_delete AND status = 'in_transit') AS shipments_in_transit, \
               (SELECT COUNT(*) FROM shop.vehicle WHERE NOT is_delete) AS active_vehicles, \
               (SELECT COALESCE(SUM(total), 0) FROM shop.orders \
                  WHERE NOT is_delete AND status <> 'cancelled') AS revenue",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(stats)
    }
}
