//! Fleet and shipment types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use tradepost_core::{
    EmployeeId, LookupId, OrderId, ShipmentId, ShipmentStatus, VehicleDocumentId, VehicleId,
};

/// A shipment (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub order_id: OrderId,
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_plate: Option<String>,
    pub employee_id: Option<EmployeeId>,
    pub employee_name: Option<String>,
    pub tracking_code: String,
    pub status: ShipmentStatus,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub is_delete: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    /// Cast from `NUMERIC` in the query.
    pub capacity_kg: f64,
    pub vehicle_type_id: LookupId,
    pub vehicle_type: String,
    pub vehicle_status_id: LookupId,
    pub vehicle_status: String,
    pub is_delete: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VehicleDocument {
    pub id: VehicleDocumentId,
    pub vehicle_id: VehicleId,
    pub document_type_id: LookupId,
    pub document_type: String,
    pub document_number: String,
    pub expires_on: NaiveDate,
}

impl VehicleDocument {
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on < today
    }
}

/// A vehicle with its documents.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    pub documents: Vec<VehicleDocument>,
}
