//! Vehicle detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use tower_sessions::Session;
use tracing::instrument;

use tradepost_core::VehicleId;

use crate::db::VehicleRepository;
use crate::error::AppError;
use crate::filters;
use crate::format::format_date;
use crate::middleware::RequireAuth;
use crate::models::{VehicleDetail, VehicleDocument};
use crate::state::AppState;

use super::LayoutView;

pub fn router() -> Router<AppState> {
    Router::new().route("/vehicles/{id}", get(show))
}

/// Document view for templates.
#[derive(Debug, Clone)]
pub struct DocumentView {
    pub document_type: String,
    pub number: String,
    pub expires_on: String,
    pub expired: bool,
}

impl DocumentView {
    fn new(doc: &VehicleDocument, today: NaiveDate) -> Self {
        Self {
            document_type: doc.document_type.clone(),
            number: doc.document_number.clone(),
            expires_on: format_date(doc.expires_on),
            expired: doc.is_expired(today),
        }
    }
}

/// Vehicle view for templates.
#[derive(Debug, Clone)]
pub struct VehicleView {
    pub id: i32,
    pub plate: String,
    pub name: String,
    pub year: i32,
    pub capacity: String,
    pub vehicle_type: String,
    pub vehicle_status: String,
    pub deleted: bool,
    pub documents: Vec<DocumentView>,
    pub expired_documents: usize,
}

impl VehicleView {
    fn new(detail: &VehicleDetail, today: NaiveDate) -> Self {
        let v = &detail.vehicle;
        let documents: Vec<DocumentView> = detail
            .documents
            .iter()
            .map(|d| DocumentView::new(d, today))
            .collect();
        Self {
            id: v.id.as_i32(),
            plate: v.plate.clone(),
            name: format!("{} {}", v.brand, v.model),
            year: v.year,
            capacity: format!("{:.0} kg", v.capacity_kg),
            vehicle_type: v.vehicle_type.clone(),
            vehicle_status: v.vehicle_status.clone(),
            deleted: v.is_delete,
            expired_documents: documents.iter().filter(|d| d.expired).count(),
            documents,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "vehicles/show.html")]
pub struct VehicleShowTemplate {
    pub layout: LayoutView,
    pub vehicle: VehicleView,
}

/// GET /vehicles/{id}
#[instrument(skip(user, state, session))]
async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<VehicleId>,
) -> Result<VehicleShowTemplate, AppError> {
    let detail = VehicleRepository::new(state.pool())
        .detail(id)
        .await
        .map_err(|e| AppError::from_repository(e, &format!("vehicle {id}")))?;

    Ok(VehicleShowTemplate {
        layout: LayoutView::new(&user, &session, &format!("/vehicles/{id}")).await,
        vehicle: VehicleView::new(&detail, Utc::now().date_naive()),
    })
}
