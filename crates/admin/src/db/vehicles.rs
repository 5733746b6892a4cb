//! Vehicle repository.

use serde::Deserialize;
use sqlx::PgPool;

use tradepost_core::{LookupId, VehicleId};

use super::RepositoryError;
use super::listing::{self, Filters, ListSpec, Listable, ScopeFilter, empty_as_none};
use crate::models::{Vehicle, VehicleDetail, VehicleDocument};

/// Vehicle filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub vehicle_type_id: Option<LookupId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub vehicle_status_id: Option<LookupId>,
}

impl ScopeFilter for VehicleScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(id) = self.vehicle_type_id {
            filters.and().push("v.vehicle_type_id = ").push_bind(id.as_i32());
        }
        if let Some(id) = self.vehicle_status_id {
            filters.and().push("v.vehicle_status_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Vehicles;

impl Listable for Vehicles {
    const ENTITY: &'static str = "vehicle";
    const SLUG: &'static str = "vehicles";
    const TITLE: &'static str = "Vehicles";
    const TABLE: &'static str = "vehicle";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT v.id, v.plate, v.brand, v.model, v.year, \
                 v.capacity_kg::float8 AS capacity_kg, \
                 v.vehicle_type_id, vt.name AS vehicle_type, \
                 v.vehicle_status_id, vs.name AS vehicle_status, v.is_delete \
                 FROM shop.vehicle v \
                 JOIN shop.vehicle_type vt ON vt.id = v.vehicle_type_id \
                 JOIN shop.vehicle_status vs ON vs.id = v.vehicle_status_id",
        count: "SELECT COUNT(*) FROM shop.vehicle v",
        id_column: "v.id",
        text_columns: &["v.plate", "v.brand", "v.model"],
        active: Some("NOT v.is_delete"),
        order_by: "v.plate",
    };
    const SOFT_DELETE: bool = true;

    type Row = Vehicle;
    type Item = Vehicle;
    type Scope = VehicleScope;

    fn convert(row: Vehicle) -> Result<Vehicle, RepositoryError> {
        Ok(row)
    }
}

/// Repository for vehicle detail views.
pub struct VehicleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VehicleRepository<'a> {
    /// Create a new vehicle repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A vehicle with its documents, soonest expiry first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vehicle does not exist.
    pub async fn detail(&self, id: VehicleId) -> Result<VehicleDetail, RepositoryError> {
        let vehicle = listing::find::<Vehicles>(self.pool, id.as_i32()).await?;

        let documents = sqlx::query_as::<_, VehicleDocument>(
            "SELECT d.id, d.vehicle_id, d.document_type_id, t.name AS document_type, \
             d.document_number, d.expires_on \
             FROM shop.vehicle_document d \
             JOIN shop.vehicle_document_type t ON t.id = d.document_type_id \
             WHERE d.vehicle_id = $1 \
             ORDER BY d.expires_on",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(VehicleDetail { vehicle, documents })
    }
}
