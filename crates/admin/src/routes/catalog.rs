//! Public catalog.
//!
//! Browsing needs no login. Only active products and their active variants
//! are shown; inactive products answer 404.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use tradepost_core::ProductId;

use crate::db::listing::{self, ListQuery};
use crate::db::products::ProductScope;
use crate::db::{ProductRepository, Products};
use crate::error::AppError;
use crate::filters;
use crate::format::format_money;
use crate::models::Product;
use crate::state::AppState;

use super::{vary_on_htmx, wants_fragment};
use super::products::ProductView;
use super::resources::{ListParams, PagerView};

const CATALOG_PATH: &str = "/catalog";
const CATALOG_PAGE_SIZE: u32 = 12;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(CATALOG_PATH, get(index))
        .route("/catalog/{id}", get(show))
}

/// Product card in the grid.
#[derive(Debug, Clone)]
pub struct CatalogCard {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: String,
}

impl From<&Product> for CatalogCard {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.as_i32(),
            name: p.name.clone(),
            category: p.category_name.clone(),
            price: format_money(p.base_price),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub cards: Vec<CatalogCard>,
    pub pager: PagerView,
    pub search_query: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "catalog/_grid.html")]
pub struct CatalogGridTemplate {
    pub cards: Vec<CatalogCard>,
    pub pager: PagerView,
}

#[derive(Template, WebTemplate)]
#[template(path = "catalog/show.html")]
pub struct CatalogShowTemplate {
    pub product: ProductView,
}

/// Inactive rows never reach the public listing.
fn catalog_query(params: &ListParams) -> ListQuery {
    let mut query = ListParams {
        limit: Some(params.limit.unwrap_or(CATALOG_PAGE_SIZE)),
        ..params.clone()
    }
    .to_query();
    query.include_inactive = false;
    query
}

/// GET /catalog
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<ListParams>,
    Query(scope): Query<ProductScope>,
) -> Result<Response, AppError> {
    let query = catalog_query(&params);
    let page = listing::paginate::<Products>(state.pool(), &query, &scope).await?;

    let pager = PagerView::new(
        CATALOG_PATH,
        raw_query.as_deref(),
        page.current_page,
        page.total_pages,
        page.total,
    );
    let cards = page.items.iter().map(CatalogCard::from).collect();

    if wants_fragment(&headers) {
        return Ok(vary_on_htmx(
            CatalogGridTemplate { cards, pager }.into_response(),
        ));
    }

    Ok(vary_on_htmx(
        CatalogTemplate {
            cards,
            pager,
            search_query: params.q.unwrap_or_default(),
        }
        .into_response(),
    ))
}

/// GET /catalog/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<CatalogShowTemplate, AppError> {
    let detail = ProductRepository::new(state.pool())
        .catalog_detail(id)
        .await
        .map_err(|e| AppError::from_repository(e, "product"))?;

    Ok(CatalogShowTemplate {
        product: ProductView::from(&detail),
    })
}
