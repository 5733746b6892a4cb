//! Guarded hard delete.
//!
//! A row is only removed when no other table still references it. The check
//! and the delete run in one transaction with the target row locked
//! (`SELECT ... FOR UPDATE`), so a reference inserted concurrently either waits
//! for the delete or fails its foreign key.
//!
//! The decision logic lives in [`check_and_delete`] over the [`DeleteStore`]
//! trait; [`PgDeleteStore`] is the transactional `PostgreSQL` implementation.

use sqlx::{PgPool, Postgres, Transaction};

use super::RepositoryError;

/// A table/column pair that references the delete target by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    /// Plural name shown to users ("product variants").
    pub relation: &'static str,
    pub table: &'static str,
    pub column: &'static str,
}

impl Dependent {
    #[must_use]
    pub const fn new(relation: &'static str, table: &'static str, column: &'static str) -> Self {
        Self {
            relation,
            table,
            column,
        }
    }
}

/// The table a delete is aimed at and the tables that may block it.
#[derive(Debug, Clone, Copy)]
pub struct DeleteTarget {
    pub entity: &'static str,
    pub table: &'static str,
    pub dependents: &'static [Dependent],
}

/// Storage operations needed by a guarded delete.
#[allow(async_fn_in_trait)]
pub trait DeleteStore {
    /// Lock the target row and report whether it exists.
    async fn lock_exists(&mut self, target: &DeleteTarget, id: i32)
    -> Result<bool, RepositoryError>;

    /// Count rows of `dependent` referencing `id`.
    async fn count_references(
        &mut self,
        dependent: &Dependent,
        id: i32,
    ) -> Result<i64, RepositoryError>;

    async fn remove(&mut self, target: &DeleteTarget, id: i32) -> Result<(), RepositoryError>;
}

/// Missing row, then dependents, then delete. Stops at the first dependent
/// relation with references.
///
/// # Errors
///
/// - `RepositoryError::NotFound` if the target does not exist
/// - `RepositoryError::HasDependents` naming the first blocking relation
/// - `RepositoryError::Database` if any statement fails
pub async fn check_and_delete<S: DeleteStore>(
    store: &mut S,
    target: &DeleteTarget,
    id: i32,
) -> Result<(), RepositoryError> {
    if !store.lock_exists(target, id).await? {
        return Err(RepositoryError::NotFound);
    }

    for dependent in target.dependents {
        let count = store.count_references(dependent, id).await?;
        if count > 0 {
            return Err(RepositoryError::HasDependents {
                entity: target.entity,
                relation: dependent.relation,
                count,
            });
        }
    }

    store.remove(target, id).await
}

/// [`DeleteStore`] running inside one `PostgreSQL` transaction.
pub struct PgDeleteStore {
    tx: Transaction<'static, Postgres>,
}

impl PgDeleteStore {
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction cannot start.
    pub async fn begin(pool: &PgPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the commit fails.
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl DeleteStore for PgDeleteStore {
    async fn lock_exists(
        &mut self,
        target: &DeleteTarget,
        id: i32,
    ) -> Result<bool, RepositoryError> {
        let sql = format!("SELECT id FROM shop.{} WHERE id = $1 FOR UPDATE", target.table);
        let row: Option<i32> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.is_some())
    }

    async fn count_references(
        &mut self,
        dependent: &Dependent,
        id: i32,
    ) -> Result<i64, RepositoryError> {
        let sql = format!(
            "SELECT COUNT(*) FROM shop.{} WHERE {} = $1",
            dependent.table, dependent.column
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn remove(&mut self, target: &DeleteTarget, id: i32) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM shop.{} WHERE id = $1", target.table);
        sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "{} is still referenced by other records",
                        target.entity
                    ));
                }
                RepositoryError::Database(e)
            })?;
        Ok(())
    }
}

/// Delete `id` from `target` unless something references it.
///
/// The transaction rolls back on every error path.
///
/// # Errors
///
/// See [`check_and_delete`].
pub async fn guarded_delete(
    pool: &PgPool,
    target: &DeleteTarget,
    id: i32,
) -> Result<(), RepositoryError> {
    let mut store = PgDeleteStore::begin(pool).await?;
    check_and_delete(&mut store, target, id).await?;
    store.commit().await?;

    tracing::info!(entity = target.entity, id, "row deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const VARIANTS_BY_COLOR: Dependent =
        Dependent::new("product variants", "product_variant", "color_id");
    const COLOR: DeleteTarget = DeleteTarget {
        entity: "color",
        table: "color",
        dependents: &[VARIANTS_BY_COLOR],
    };

    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<i32>,
        references: HashMap<(&'static str, i32), i64>,
        removed: Vec<i32>,
        locked: Vec<i32>,
    }

    impl DeleteStore for MemoryStore {
        async fn lock_exists(
            &mut self,
            _target: &DeleteTarget,
            id: i32,
        ) -> Result<bool, RepositoryError> {
            self.locked.push(id);
            Ok(self.rows.contains(&id))
        }

        async fn count_references(
            &mut self,
            dependent: &Dependent,
            id: i32,
        ) -> Result<i64, RepositoryError> {
            Ok(self
                .references
                .get(&(dependent.table, id))
                .copied()
                .unwrap_or(0))
        }

        async fn remove(&mut self, _target: &DeleteTarget, id: i32) -> Result<(), RepositoryError> {
            self.rows.retain(|r| *r != id);
            self.removed.push(id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let mut store = MemoryStore::default();
        let result = check_and_delete(&mut store, &COLOR, 7).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert!(store.removed.is_empty());
    }

    #[tokio::test]
    async fn referenced_row_is_kept() {
        let mut store = MemoryStore {
            rows: vec![7],
            references: HashMap::from([(("product_variant", 7), 4)]),
            ..MemoryStore::default()
        };

        let result = check_and_delete(&mut store, &COLOR, 7).await;
        match result {
            Err(RepositoryError::HasDependents {
                entity,
                relation,
                count,
            }) => {
                assert_eq!(entity, "color");
                assert_eq!(relation, "product variants");
                assert_eq!(count, 4);
            }
            other => panic!("expected HasDependents, got {other:?}"),
        }
        assert_eq!(store.rows, vec![7]);
        assert!(store.removed.is_empty());
    }

    #[tokio::test]
    async fn unreferenced_row_is_deleted_after_locking() {
        let mut store = MemoryStore {
            rows: vec![7, 8],
            references: HashMap::from([(("product_variant", 8), 1)]),
            ..MemoryStore::default()
        };

        check_and_delete(&mut store, &COLOR, 7).await.ok();
        assert_eq!(store.locked, vec![7]);
        assert_eq!(store.removed, vec![7]);
        assert_eq!(store.rows, vec![8]);
    }

    #[tokio::test]
    async fn target_without_dependents_deletes_directly() {
        const PLAIN: DeleteTarget = DeleteTarget {
            entity: "size",
            table: "size",
            dependents: &[],
        };
        let mut store = MemoryStore {
            rows: vec![1],
            ..MemoryStore::default()
        };
        assert!(check_and_delete(&mut store, &PLAIN, 1).await.is_ok());
        assert_eq!(store.removed, vec![1]);
    }
}
