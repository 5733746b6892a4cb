//! Shipment listing.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use tradepost_core::{
    EmployeeId, OrderId, ShipmentId, ShipmentStatus, VehicleId,
};

use super::RepositoryError;
use super::listing::{Filters, ListSpec, Listable, ScopeFilter, empty_as_none};
use crate::models::Shipment;

pub(crate) const SHIPMENT_SELECT: &str = "SELECT s.id, s.order_id, s.vehicle_id, \
     v.plate AS vehicle_plate, s.employee_id, \
     (p.first_name || ' ' || p.last_name) AS employee_name, \
     s.tracking_code, s.status, s.shipped_at, s.delivered_at, s.is_delete \
     FROM shop.shipment s \
     LEFT JOIN shop.vehicle v ON v.id = s.vehicle_id \
     LEFT JOIN shop.employee e ON e.id = s.employee_id \
     LEFT JOIN shop.person p ON p.id = e.person_id";

/// Internal row type for shipment queries.
#[derive(Debug, sqlx::FromRow)]
pub struct ShipmentRow {
    id: i32,
    order_id: i32,
    vehicle_id: Option<i32>,
    vehicle_plate: Option<String>,
    employee_id: Option<i32>,
    employee_name: Option<String>,
    tracking_code: String,
    status: String,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    is_delete: bool,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = RepositoryError;

    fn try_from(row: ShipmentRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ShipmentStatus>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: ShipmentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            vehicle_id: row.vehicle_id.map(VehicleId::new),
            vehicle_plate: row.vehicle_plate,
            employee_id: row.employee_id.map(EmployeeId::new),
            employee_name: row.employee_name,
            tracking_code: row.tracking_code,
            status,
            shipped_at: row.shipped_at,
            delivered_at: row.delivered_at,
            is_delete: row.is_delete,
        })
    }
}

/// Shipment filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<ShipmentStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub vehicle_id: Option<VehicleId>,
}

impl ScopeFilter for ShipmentScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(status) = self.status {
            filters.and().push("s.status = ").push_bind(status.as_str());
        }
        if let Some(id) = self.order_id {
            filters.and().push("s.order_id = ").push_bind(id.as_i32());
        }
        if let Some(id) = self.vehicle_id {
            filters.and().push("s.vehicle_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Shipments;

impl Listable for Shipments {
    const ENTITY: &'static str = "shipment";
    const SLUG: &'static str = "shipments";
    const TITLE: &'static str = "Shipments";
    const TABLE: &'static str = "shipment";
    const SPEC: ListSpec = ListSpec {
        select: SHIPMENT_SELECT,
        count: "SELECT COUNT(*) FROM shop.shipment s \
                LEFT JOIN shop.vehicle v ON v.id = s.vehicle_id",
        id_column: "s.id",
        text_columns: &["s.tracking_code", "v.plate"],
        active: Some("NOT s.is_delete"),
        order_by: "s.id DESC",
    };
    const SOFT_DELETE: bool = true;

    type Row = ShipmentRow;
    type Item = Shipment;
    type Scope = ShipmentScope;

    fn convert(row: ShipmentRow) -> Result<Shipment, RepositoryError> {
        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Postgres, QueryBuilder};

    use super::*;

    #[test]
    fn scope_filters_compose() {
        let scope = ShipmentScope {
            status: Some(ShipmentStatus::InTransit),
            order_id: None,
            vehicle_id: Some(VehicleId::new(2)),
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM shop.shipment s");
        scope.apply(&mut Filters::new(&mut qb));
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM shop.shipment s WHERE s.status = $1 AND s.vehicle_id = $2"
        );
    }

    #[test]
    fn unknown_status_is_corruption() {
        let row = ShipmentRow {
            id: 1,
            order_id: 1,
            vehicle_id: None,
            vehicle_plate: None,
            employee_id: None,
            employee_name: None,
            tracking_code: "TP-0001".to_string(),
            status: "teleported".to_string(),
            shipped_at: None,
            delivered_at: None,
            is_delete: false,
        };
        assert!(matches!(
            Shipment::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
