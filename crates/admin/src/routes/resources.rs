//! Generic list pages.
//!
//! One handler serves every entity implementing [`TableView`]. Full requests
//! get the page; HTMX requests (debounced search, filters, pager) get only the
//! table fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{OriginalUri, Query, RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;

use tradepost_core::{Pagination, SearchTerm, UserRole};

use crate::components::{DataTableConfig, TableFilter, TableRow, TableView};
use crate::db::lookups::{
    Categories, Colors, Sizes, VehicleDocumentTypes, VehicleStatuses, VehicleTypes,
};
use crate::db::listing::{self, ListQuery, empty_as_none};
use crate::db::{
    Cities, Countries, Customers, Employees, Orders, Products, Provinces, Shipments, Users,
    Vehicles,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::{LayoutView, vary_on_htmx, wants_fragment};

/// Query parameters shared by every listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub include_inactive: Option<bool>,
}

impl ListParams {
    #[must_use]
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            term: SearchTerm::from_option(self.q.as_deref()),
            pagination: Pagination::from_query(self.page, self.limit),
            include_inactive: self.include_inactive.unwrap_or(false),
        }
    }
}

/// Previous/next links that keep the current search and filters.
#[derive(Debug, Clone)]
pub struct PagerView {
    pub current: u32,
    pub total_pages: u32,
    pub total: i64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PagerView {
    #[must_use]
    pub fn new(path: &str, raw_query: Option<&str>, current: u32, total_pages: u32, total: i64) -> Self {
        Self {
            current,
            total_pages,
            total,
            prev_href: (current > 1).then(|| page_href(path, raw_query, current - 1)),
            next_href: (current < total_pages).then(|| page_href(path, raw_query, current + 1)),
        }
    }
}

/// `path?…&page=n`, keeping every other parameter of `raw_query`.
#[must_use]
pub fn page_href(path: &str, raw_query: Option<&str>, page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(raw_query.unwrap_or_default().as_bytes()) {
        if key != "page" {
            query.append_pair(&key, &value);
        }
    }
    query.append_pair("page", &page.to_string());
    format!("{path}?{}", query.finish())
}

/// First value of `key` in a raw query string.
#[must_use]
pub fn query_value(raw_query: Option<&str>, key: &str) -> Option<String> {
    form_urlencoded::parse(raw_query.unwrap_or_default().as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Full list page.
#[derive(Template, WebTemplate)]
#[template(path = "resources/index.html")]
pub struct ListPageTemplate {
    pub layout: LayoutView,
    pub title: &'static str,
    pub page_path: &'static str,
    pub api_path: String,
    pub config: DataTableConfig,
    pub filters: Vec<TableFilter>,
    pub rows: Vec<TableRow>,
    pub pager: PagerView,
    pub search_query: String,
    pub include_inactive: bool,
    pub can_delete: bool,
    pub can_toggle: bool,
}

/// Table fragment for HTMX swaps.
#[derive(Template, WebTemplate)]
#[template(path = "resources/_table.html")]
pub struct TableFragmentTemplate {
    pub page_path: &'static str,
    pub api_path: String,
    pub config: DataTableConfig,
    pub rows: Vec<TableRow>,
    pub pager: PagerView,
    pub can_delete: bool,
    pub can_toggle: bool,
}

/// List page for `L`.
#[instrument(skip_all, fields(entity = L::ENTITY))]
pub async fn list_page<L: TableView>(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<ListParams>,
    Query(scope): Query<L::Scope>,
) -> Result<Response, AppError> {
    let query = params.to_query();
    let page = listing::paginate::<L>(state.pool(), &query, &scope).await?;

    let raw = raw_query.as_deref();
    let pager = PagerView::new(L::PAGE_PATH, raw, page.current_page, page.total_pages, page.total);
    let rows = page.items.iter().map(L::row).collect();
    let api_path = format!("/api/{}", L::SLUG);
    let can_delete = L::DEPENDENTS.is_some() && user.can(UserRole::Admin);
    let can_toggle = L::SOFT_DELETE && user.can(UserRole::Staff);

    if wants_fragment(&headers) {
        return Ok(vary_on_htmx(TableFragmentTemplate {
            page_path: L::PAGE_PATH,
            api_path,
            config: L::config(),
            rows,
            pager,
            can_delete,
            can_toggle,
        }
        .into_response()));
    }

    let filters = L::filters(state.pool())
        .await?
        .into_iter()
        .map(|filter| {
            let selected = query_value(raw, filter.key);
            filter.with_selected(selected.as_deref())
        })
        .collect();

    Ok(vary_on_htmx(ListPageTemplate {
        layout: LayoutView::new(&user, &session, uri.path()).await,
        title: L::TITLE,
        page_path: L::PAGE_PATH,
        api_path,
        config: L::config(),
        filters,
        rows,
        pager,
        search_query: params.q.unwrap_or_default(),
        include_inactive: query.include_inactive,
        can_delete,
        can_toggle,
    }
    .into_response()))
}

fn page<L: TableView>(router: Router<AppState>) -> Router<AppState> {
    router.route(L::PAGE_PATH, get(list_page::<L>))
}

/// Every list page.
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = page::<Customers>(router);
    let router = page::<Employees>(router);
    let router = page::<Users>(router);
    let router = page::<Products>(router);
    let router = page::<Orders>(router);
    let router = page::<Shipments>(router);
    let router = page::<Vehicles>(router);
    let router = page::<Countries>(router);
    let router = page::<Provinces>(router);
    let router = page::<Cities>(router);
    let router = page::<Categories>(router);
    let router = page::<Colors>(router);
    let router = page::<Sizes>(router);
    let router = page::<VehicleTypes>(router);
    let router = page::<VehicleStatuses>(router);
    page::<VehicleDocumentTypes>(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_normalize_into_list_query() {
        let params = ListParams {
            q: Some("  42 ".to_string()),
            page: Some(0),
            limit: Some(500),
            include_inactive: None,
        };
        let query = params.to_query();
        assert_eq!(query.term, SearchTerm::Numeric(42));
        assert_eq!(query.pagination.page(), 1);
        assert_eq!(query.pagination.limit(), Pagination::MAX_LIMIT);
        assert!(!query.include_inactive);
    }

    #[test]
    fn page_links_keep_other_parameters() {
        let href = page_href("/orders", Some("q=ana&status=paid&page=2"), 3);
        assert_eq!(href, "/orders?q=ana&status=paid&page=3");
        assert_eq!(page_href("/orders", None, 1), "/orders?page=1");
    }

    #[test]
    fn pager_edges() {
        let first = PagerView::new("/orders", None, 1, 3, 25);
        assert!(first.prev_href.is_none());
        assert_eq!(first.next_href.as_deref(), Some("/orders?page=2"));

        let last = PagerView::new("/orders", Some("page=3"), 3, 3, 25);
        assert_eq!(last.prev_href.as_deref(), Some("/orders?page=2"));
        assert!(last.next_href.is_none());

        let empty = PagerView::new("/orders", None, 1, 0, 0);
        assert!(empty.prev_href.is_none() && empty.next_href.is_none());
    }

    #[test]
    fn query_values_are_decoded() {
        assert_eq!(
            query_value(Some("q=a%20b&status=in_transit"), "q").as_deref(),
            Some("a b")
        );
        assert_eq!(query_value(Some("q="), "status"), None);
    }
}
