//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use tradepost_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::format::{format_datetime, format_money};
use crate::middleware::RequireAuth;
use crate::models::{ProductDetail, ProductVariant};
use crate::state::AppState;

use super::LayoutView;

pub fn router() -> Router<AppState> {
    Router::new().route("/products/{id}", get(show))
}

/// Variant view for templates.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: i32,
    pub sku: String,
    pub color: String,
    pub size: String,
    pub price: String,
    pub stock: i32,
    pub in_stock: bool,
    pub active: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(v: &ProductVariant) -> Self {
        Self {
            id: v.id.as_i32(),
            sku: v.sku.clone(),
            color: v.color_name.clone(),
            size: v.size_name.clone(),
            price: format_money(v.price),
            stock: v.stock,
            in_stock: v.in_stock(),
            active: v.state,
        }
    }
}

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub base_price: String,
    pub created_at: String,
    pub active: bool,
    pub total_stock: i64,
    pub variants: Vec<VariantView>,
}

impl From<&ProductDetail> for ProductView {
    fn from(detail: &ProductDetail) -> Self {
        let p = &detail.product;
        Self {
            id: p.id.as_i32(),
            name: p.name.clone(),
            category: p.category_name.clone(),
            description: p.description.clone().unwrap_or_default(),
            base_price: format_money(p.base_price),
            created_at: format_datetime(p.created_at),
            active: p.state,
            total_stock: detail.total_stock(),
            variants: detail.variants.iter().map(VariantView::from).collect(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutView,
    pub product: ProductView,
    pub can_delete: bool,
}

/// GET /products/{id}
#[instrument(skip(user, state, session))]
async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate, AppError> {
    let detail = ProductRepository::new(state.pool())
        .detail(id)
        .await
        .map_err(|e| AppError::from_repository(e, &format!("product {id}")))?;

    Ok(ProductShowTemplate {
        layout: LayoutView::new(&user, &session, &format!("/products/{id}")).await,
        product: ProductView::from(&detail),
        can_delete: user.can(tradepost_core::UserRole::Admin),
    })
}
