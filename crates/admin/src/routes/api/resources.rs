//! Generic JSON actions over every listable entity.
//!
//! Each entity is mounted at `/api/{slug}`. Hard delete is only routed for
//! entities with dependents declared, deactivate/restore only for entities
//! with an `is_delete` flag.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::HeaderName,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tradepost_core::{ActionError, SearchTerm};

use crate::db::guard::guarded_delete;
use crate::db::listing::{self, Listable, delete_target, empty_as_none};
use crate::db::lookups::{
    Categories, Colors, Sizes, VehicleDocumentTypes, VehicleStatuses, VehicleTypes,
};
use crate::db::{
    Cities, Countries, Customers, Employees, Orders, Products, Provinces, Shipments, Users,
    Variants, Vehicles,
};
use crate::error::{ActionResponse, envelope, paginated};
use crate::middleware::{Admin, RequireAuth, RequireRole, Staff};
use crate::routes::resources::ListParams;
use crate::state::AppState;

/// Result size when `limit` is not given.
const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Tells HTMX tables to reload after a mutation.
const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
const TABLE_CHANGED: &str = "table-changed";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
}

impl SearchParams {
    fn term(&self) -> SearchTerm {
        SearchTerm::from_option(self.q.as_deref())
    }
}

/// Envelope for a mutation; tables are told to reload only if it succeeded.
fn mutation_response(result: Result<Affected, ActionError>) -> Response {
    if result.is_ok() {
        (AppendHeaders([(HX_TRIGGER, TABLE_CHANGED)]), envelope(result)).into_response()
    } else {
        envelope(result).into_response()
    }
}

/// Id of the row a mutation touched.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Affected {
    pub id: i32,
}

/// GET /api/{slug}
#[instrument(skip_all, fields(entity = L::ENTITY))]
async fn list<L: Listable>(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(scope): Query<L::Scope>,
) -> ActionResponse<Vec<L::Item>> {
    let result = listing::paginate::<L>(state.pool(), &params.to_query(), &scope)
        .await
        .map_err(|e| e.into_action(L::ENTITY));
    paginated(result)
}

/// GET /api/{slug}/search?q=&limit=
#[instrument(skip_all, fields(entity = L::ENTITY))]
async fn search<L: Listable>(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    Query(scope): Query<L::Scope>,
) -> ActionResponse<Vec<L::Item>> {
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let result = listing::search::<L>(state.pool(), &params.term(), limit, &scope)
        .await
        .map_err(|e| e.into_action(L::ENTITY));
    envelope(result)
}

/// GET /api/{slug}/by-term?q=
#[instrument(skip_all, fields(entity = L::ENTITY))]
async fn by_term<L: Listable>(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ActionResponse<L::Item> {
    let result = listing::first_by_term::<L>(state.pool(), &params.term())
        .await
        .map_err(|e| e.into_action(L::ENTITY));
    envelope(result)
}

/// GET /api/{slug}/{id}
#[instrument(skip_all, fields(entity = L::ENTITY, id = id))]
async fn get_one<L: Listable>(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ActionResponse<L::Item> {
    let result = listing::find::<L>(state.pool(), id)
        .await
        .map_err(|e| e.into_action(L::ENTITY));
    envelope(result)
}

/// DELETE /api/{slug}/{id}
#[instrument(skip_all, fields(entity = L::ENTITY, id = id))]
async fn delete<L: Listable>(
    auth: RequireRole<Admin>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    let user = auth.into_user();
    tracing::info!(user_id = %user.id, "delete requested");

    let result = match delete_target::<L>() {
        Some(target) => guarded_delete(state.pool(), &target, id)
            .await
            .map(|()| Affected { id })
            .map_err(|e| e.into_action(L::ENTITY)),
        None => Err(ActionError::bad_request(format!(
            "{} cannot be deleted",
            L::ENTITY
        ))),
    };
    mutation_response(result)
}

async fn set_deleted<L: Listable>(state: &AppState, id: i32, deleted: bool) -> Response {
    let result = listing::set_deleted::<L>(state.pool(), id, deleted)
        .await
        .map(|()| Affected { id })
        .map_err(|e| e.into_action(L::ENTITY));
    mutation_response(result)
}

/// POST /api/{slug}/{id}/deactivate
#[instrument(skip_all, fields(entity = L::ENTITY, id = id))]
async fn deactivate<L: Listable>(
    _auth: RequireRole<Staff>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    set_deleted::<L>(&state, id, true).await
}

/// POST /api/{slug}/{id}/restore
#[instrument(skip_all, fields(entity = L::ENTITY, id = id))]
async fn restore<L: Listable>(
    _auth: RequireRole<Staff>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    set_deleted::<L>(&state, id, false).await
}

/// Actions for one entity, to be nested under `/api/{slug}`.
pub fn resource_router<L: Listable>() -> Router<AppState> {
    let mut item = get(get_one::<L>);
    if L::DEPENDENTS.is_some() {
        item = item.delete(delete::<L>);
    }

    let mut router = Router::new()
        .route("/", get(list::<L>))
        .route("/search", get(search::<L>))
        .route("/by-term", get(by_term::<L>))
        .route("/{id}", item);

    if L::SOFT_DELETE {
        router = router
            .route("/{id}/deactivate", post(deactivate::<L>))
            .route("/{id}/restore", post(restore::<L>));
    }
    router
}

fn mount<L: Listable>(router: Router<AppState>) -> Router<AppState> {
    router.nest(&format!("/api/{}", L::SLUG), resource_router::<L>())
}

/// Actions for every entity.
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = mount::<Customers>(router);
    let router = mount::<Employees>(router);
    let router = mount::<Users>(router);
    let router = mount::<Products>(router);
    let router = mount::<Variants>(router);
    let router = mount::<Orders>(router);
    let router = mount::<Shipments>(router);
    let router = mount::<Vehicles>(router);
    let router = mount::<Countries>(router);
    let router = mount::<Provinces>(router);
    let router = mount::<Cities>(router);
    let router = mount::<Categories>(router);
    let router = mount::<Colors>(router);
    let router = mount::<Sizes>(router);
    let router = mount::<VehicleTypes>(router);
    let router = mount::<VehicleStatuses>(router);
    mount::<VehicleDocumentTypes>(router)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn successful_mutation_reloads_tables() {
        let response = mutation_response(Ok(Affected { id: 4 }));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&HX_TRIGGER], TABLE_CHANGED);
    }

    #[test]
    fn refused_mutation_leaves_tables_alone() {
        for err in [
            ActionError::not_found("category"),
            ActionError::has_dependents("category", "products", 2),
            ActionError::bad_request("customer cannot be deleted"),
        ] {
            let response = mutation_response(Err(err));
            assert!(!response.status().is_success());
            assert!(response.headers().get(&HX_TRIGGER).is_none());
        }
    }
}
