//! Generic search, pagination and term lookup over one entity listing.
//!
//! Each entity describes its listing query once as a [`ListSpec`] and the
//! functions here build every variant of it with a `sqlx::QueryBuilder`:
//!
//! - [`search`] - up to `limit` active rows matching a [`SearchTerm`]
//! - [`paginate`] - one [`Page`] plus the total count under the same filter
//! - [`first_by_term`] - first matching row or [`RepositoryError::NotFound`]
//! - [`find`] - one row by id, active or not
//! - [`set_deleted`] - flip the `is_delete` flag
//!
//! A numeric term becomes `id = $n`; any other term becomes an `ILIKE` over the
//! entity's text columns.

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use tradepost_core::{Page, Pagination, SearchTerm};

use super::RepositoryError;
use super::guard::{DeleteTarget, Dependent};

/// Static description of an entity's listing query.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    /// `SELECT ... FROM ... [JOIN ...]` without a `WHERE` clause.
    pub select: &'static str,
    /// `SELECT COUNT(*) FROM ...` with the same joins as `select`.
    pub count: &'static str,
    /// Qualified id column, e.g. `c.id`.
    pub id_column: &'static str,
    /// Columns searched with `ILIKE` for text terms.
    pub text_columns: &'static [&'static str],
    /// Predicate selecting active rows, if the entity can be deactivated.
    pub active: Option<&'static str>,
    pub order_by: &'static str,
}

/// A listable entity: its query, row type and public item type.
pub trait Listable: Send + Sync + 'static {
    /// Singular name used in messages ("customer").
    const ENTITY: &'static str;
    /// URL segment ("customers").
    const SLUG: &'static str;
    /// Page heading ("Customers").
    const TITLE: &'static str;
    /// Table under the `shop` schema.
    const TABLE: &'static str;
    const SPEC: ListSpec;
    /// Whether the table has an `is_delete` flag that can be toggled.
    const SOFT_DELETE: bool = false;
    /// Rows that block a hard delete. `None` means hard delete is not offered.
    const DEPENDENTS: Option<&'static [Dependent]> = None;

    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;
    type Item: Serialize + Send + Sync;
    type Scope: ScopeFilter + DeserializeOwned + Default + Send + Sync;

    /// Turn a raw row into the public item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the row holds invalid data.
    fn convert(row: Self::Row) -> Result<Self::Item, RepositoryError>;
}

/// Hard-delete target for `L`, if the entity offers hard deletes.
#[must_use]
pub fn delete_target<L: Listable>() -> Option<DeleteTarget> {
    L::DEPENDENTS.map(|dependents| DeleteTarget {
        entity: L::ENTITY,
        table: L::TABLE,
        dependents,
    })
}

/// Normalized listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub term: SearchTerm,
    pub pagination: Pagination,
    pub include_inactive: bool,
}

/// Appends `WHERE`/`AND` conjunctions to a query under construction.
pub struct Filters<'b, 'args> {
    qb: &'b mut QueryBuilder<'args, Postgres>,
    started: bool,
}

impl<'b, 'args> Filters<'b, 'args> {
    pub fn new(qb: &'b mut QueryBuilder<'args, Postgres>) -> Self {
        Self { qb, started: false }
    }

    /// Start a new conjunct and return the builder to write it.
    pub fn and(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        self.qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
        &mut *self.qb
    }
}

/// Entity-specific narrowing, e.g. products of one category.
pub trait ScopeFilter {
    fn apply(&self, filters: &mut Filters<'_, '_>);
}

/// Scope for entities without extra filters.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct NoScope {}

impl ScopeFilter for NoScope {
    fn apply(&self, _filters: &mut Filters<'_, '_>) {}
}

/// Deserialize an optional query value, treating `""` as absent.
///
/// HTML `<select>` elements submit `status=` for "all", which must not fail.
///
/// # Errors
///
/// Returns a deserialization error if a non-empty value does not parse.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Add the numeric/text dispatch for `term`.
pub fn push_search(filters: &mut Filters<'_, '_>, spec: &ListSpec, term: &SearchTerm) {
    match term {
        SearchTerm::Empty => {}
        SearchTerm::Numeric(id) => {
            filters.and().push(spec.id_column).push(" = ").push_bind(*id);
        }
        SearchTerm::Text(text) => {
            let qb = filters.and();
            if spec.text_columns.is_empty() {
                qb.push("FALSE");
                return;
            }
            let pattern = SearchTerm::like_pattern(text);
            qb.push("(");
            for (i, column) in spec.text_columns.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }
}

/// Add the soft-delete predicate, if the entity has one.
pub fn push_active(filters: &mut Filters<'_, '_>, spec: &ListSpec) {
    if let Some(active) = spec.active {
        filters.and().push(active);
    }
}

/// Add ordering plus `LIMIT`/`OFFSET` for one page.
pub fn push_page(qb: &mut QueryBuilder<'_, Postgres>, spec: &ListSpec, pagination: Pagination) {
    qb.push(" ORDER BY ")
        .push(spec.order_by)
        .push(" LIMIT ")
        .push_bind(i64::from(pagination.limit()))
        .push(" OFFSET ")
        .push_bind(pagination.skip());
}

fn filtered<'args, S>(
    base: &'static str,
    spec: &ListSpec,
    term: &SearchTerm,
    include_inactive: bool,
    scope: &S,
) -> QueryBuilder<'args, Postgres>
where
    S: ScopeFilter + ?Sized,
{
    let mut qb = QueryBuilder::new(base);
    {
        let mut filters = Filters::new(&mut qb);
        push_search(&mut filters, spec, term);
        if !include_inactive {
            push_active(&mut filters, spec);
        }
        scope.apply(&mut filters);
    }
    qb
}

/// Up to `limit` active rows matching `term`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn search<L: Listable>(
    pool: &PgPool,
    term: &SearchTerm,
    limit: u32,
    scope: &L::Scope,
) -> Result<Vec<L::Item>, RepositoryError> {
    let spec = L::SPEC;
    let mut qb = filtered(spec.select, &spec, term, false, scope);
    qb.push(" ORDER BY ")
        .push(spec.order_by)
        .push(" LIMIT ")
        .push_bind(i64::from(limit.clamp(1, Pagination::MAX_LIMIT)));

    let rows = qb.build_query_as::<L::Row>().fetch_all(pool).await?;
    rows.into_iter().map(L::convert).collect()
}

/// One page of rows plus the total under the same filter.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if either query fails.
pub async fn paginate<L: Listable>(
    pool: &PgPool,
    query: &ListQuery,
    scope: &L::Scope,
) -> Result<Page<L::Item>, RepositoryError> {
    let spec = L::SPEC;

    let mut count = filtered(spec.count, &spec, &query.term, query.include_inactive, scope);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = filtered(spec.select, &spec, &query.term, query.include_inactive, scope);
    push_page(&mut select, &spec, query.pagination);
    let rows = select.build_query_as::<L::Row>().fetch_all(pool).await?;
    let items = rows
        .into_iter()
        .map(L::convert)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(items, total, query.pagination))
}

/// First active row matching `term`.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` when nothing matches (including an empty term).
pub async fn first_by_term<L: Listable>(
    pool: &PgPool,
    term: &SearchTerm,
) -> Result<L::Item, RepositoryError> {
    if term.is_empty() {
        return Err(RepositoryError::NotFound);
    }
    let spec = L::SPEC;
    let mut qb = filtered(spec.select, &spec, term, false, &NoScope {});
    qb.push(" ORDER BY ").push(spec.order_by).push(" LIMIT 1");

    let row = qb.build_query_as::<L::Row>().fetch_optional(pool).await?;
    row.map(L::convert).transpose()?.ok_or(RepositoryError::NotFound)
}

/// One row by id regardless of its active flag.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no row has this id.
pub async fn find<L: Listable>(pool: &PgPool, id: i32) -> Result<L::Item, RepositoryError> {
    let spec = L::SPEC;
    let mut qb = QueryBuilder::new(spec.select);
    qb.push(" WHERE ").push(spec.id_column).push(" = ").push_bind(id);

    let row = qb.build_query_as::<L::Row>().fetch_optional(pool).await?;
    row.map(L::convert).transpose()?.ok_or(RepositoryError::NotFound)
}

/// Mark a row deleted (`true`) or restore it (`false`).
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no row has this id, or
/// `RepositoryError::Conflict` if the entity has no `is_delete` flag.
pub async fn set_deleted<L: Listable>(
    pool: &PgPool,
    id: i32,
    deleted: bool,
) -> Result<(), RepositoryError> {
    if !L::SOFT_DELETE {
        return Err(RepositoryError::Conflict(format!(
            "{} cannot be deactivated",
            L::ENTITY
        )));
    }
    let sql = format!("UPDATE shop.{} SET is_delete = $1 WHERE id = $2", L::TABLE);
    let result = sqlx::query(&sql)
        .bind(deleted)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    tracing::info!(entity = L::ENTITY, id, deleted, "soft delete flag changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: ListSpec = ListSpec {
        select: "SELECT p.id, p.name FROM shop.product p",
        count: "SELECT COUNT(*) FROM shop.product p",
        id_column: "p.id",
        text_columns: &["p.name", "p.description"],
        active: Some("p.state"),
        order_by: "p.name",
    };

    struct CategoryScope(Option<i32>);

    impl ScopeFilter for CategoryScope {
        fn apply(&self, filters: &mut Filters<'_, '_>) {
            if let Some(id) = self.0 {
                filters.and().push("p.category_id = ").push_bind(id);
            }
        }
    }

    fn sql(term: &str, include_inactive: bool, scope: &dyn ScopeFilter) -> String {
        let term = SearchTerm::parse(term);
        filtered(SPEC.select, &SPEC, &term, include_inactive, scope)
            .sql()
            .to_string()
    }

    #[test]
    fn empty_term_only_filters_active_rows() {
        assert_eq!(
            sql("", false, &NoScope {}),
            "SELECT p.id, p.name FROM shop.product p WHERE p.state"
        );
    }

    #[test]
    fn include_inactive_drops_the_active_predicate() {
        assert_eq!(
            sql("", true, &NoScope {}),
            "SELECT p.id, p.name FROM shop.product p"
        );
    }

    #[test]
    fn numeric_term_matches_id() {
        assert_eq!(
            sql("12", false, &NoScope {}),
            "SELECT p.id, p.name FROM shop.product p WHERE p.id = $1 AND p.state"
        );
    }

    #[test]
    fn text_term_searches_every_text_column() {
        assert_eq!(
            sql("shirt", false, &NoScope {}),
            "SELECT p.id, p.name FROM shop.product p \
             WHERE (p.name ILIKE $1 OR p.description ILIKE $2) AND p.state"
        );
    }

    #[test]
    fn scope_is_appended_after_search() {
        assert_eq!(
            sql("shirt", true, &CategoryScope(Some(3))),
            "SELECT p.id, p.name FROM shop.product p \
             WHERE (p.name ILIKE $1 OR p.description ILIKE $2) AND p.category_id = $3"
        );
    }

    #[test]
    fn text_term_without_text_columns_matches_nothing() {
        let spec = ListSpec {
            text_columns: &[],
            active: None,
            ..SPEC
        };
        let term = SearchTerm::parse("abc");
        let qb = filtered(spec.select, &spec, &term, false, &NoScope {});
        assert!(qb.sql().ends_with("WHERE FALSE"));
    }

    #[test]
    fn page_clause_uses_limit_and_offset() {
        let mut qb = filtered(SPEC.select, &SPEC, &SearchTerm::Empty, false, &NoScope {});
        push_page(&mut qb, &SPEC, Pagination::new(3, 20));
        assert!(qb.sql().ends_with("WHERE p.state ORDER BY p.name LIMIT $1 OFFSET $2"));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "empty_as_none")]
        id: Option<i32>,
    }

    #[test]
    fn blank_query_values_are_absent() {
        let blank: Filter = serde_json::from_str(r#"{"id": " "}"#).expect("blank");
        assert_eq!(blank.id, None);
        let missing: Filter = serde_json::from_str("{}").expect("missing");
        assert_eq!(missing.id, None);
        let set: Filter = serde_json::from_str(r#"{"id": "4"}"#).expect("set");
        assert_eq!(set.id, Some(4));
        assert!(serde_json::from_str::<Filter>(r#"{"id": "four"}"#).is_err());
    }

    #[tokio::test]
    async fn entities_without_flag_refuse_soft_delete() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://tradepost@127.0.0.1:1/tradepost")
            .expect("lazy pool");
        for deleted in [true, false] {
            let result = set_deleted::<crate::db::Users>(&pool, 1, deleted).await;
            match result {
                Err(RepositoryError::Conflict(message)) => {
                    assert_eq!(message, "user cannot be deactivated");
                }
                other => panic!("expected Conflict, got {other:?}"),
            }
        }
    }
}
