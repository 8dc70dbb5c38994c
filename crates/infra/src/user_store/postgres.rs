//! Postgres-backed user store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | `RowNotFound` | `NotFound` | `fetch_one` matched no row |
//! | `Database` | `Backend` | constraint violations, SQL errors |
//! | `PoolTimedOut` / `PoolClosed` | `Backend` | pool exhausted or shut down |
//! | Other | `Backend` | network/driver failures |
//!
//! Lookups use `fetch_optional` and map `None` to `NotFound`; `delete` checks
//! `rows_affected`.
//!
//! ## Thread Safety
//!
//! `PostgresUserStore` is `Send + Sync`; the SQLx pool handles connection
//! checkout/return.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::instrument;

use userbook_core::{User, UserDraft, UserId};

use super::context::StoreContext;
use super::r#trait::{StoreError, StoreResult, UserStore};

/// Postgres-backed user store over the `users` table.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    /// Create a new PostgresUserStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self, ctx, draft), fields(request_id = %ctx.request_id()), err)]
    async fn create(&self, ctx: &StoreContext, draft: &UserDraft) -> StoreResult<User> {
        ctx.bounded("create", async {
            let row = sqlx::query(
                r#"
                INSERT INTO users (name, dob)
                VALUES ($1, $2)
                RETURNING id, name, dob
                "#,
            )
            .bind(draft.name())
            .bind(draft.date_of_birth())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create", e))?;

            UserRow::from_row(&row).map(User::from)
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()), err)]
    async fn get_by_id(&self, ctx: &StoreContext, id: UserId) -> StoreResult<User> {
        ctx.bounded("get_by_id", async {
            let row = sqlx::query(
                r#"
                SELECT id, name, dob
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_by_id", e))?
            .ok_or(StoreError::NotFound)?;

            UserRow::from_row(&row).map(User::from)
        })
        .await
    }

    #[instrument(skip(self, ctx, draft), fields(request_id = %ctx.request_id()), err)]
    async fn update(&self, ctx: &StoreContext, id: UserId, draft: &UserDraft) -> StoreResult<User> {
        ctx.bounded("update", async {
            let row = sqlx::query(
                r#"
                UPDATE users
                SET name = $2, dob = $3
                WHERE id = $1
                RETURNING id, name, dob
                "#,
            )
            .bind(id.get())
            .bind(draft.name())
            .bind(draft.date_of_birth())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?
            .ok_or(StoreError::NotFound)?;

            UserRow::from_row(&row).map(User::from)
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()), err)]
    async fn delete(&self, ctx: &StoreContext, id: UserId) -> StoreResult<()> {
        ctx.bounded("delete", async {
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.get())
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("delete", e))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()), err)]
    async fn list(&self, ctx: &StoreContext) -> StoreResult<Vec<User>> {
        ctx.bounded("list", async {
            let rows = sqlx::query(
                r#"
                SELECT id, name, dob
                FROM users
                ORDER BY id ASC
                "#,
            )
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

            let mut users: Vec<User> = Vec::with_capacity(rows.len());
            for row in rows {
                users.push(UserRow::from_row(&row)?.into());
            }
            Ok(users)
        })
        .await
    }
}

/// Map SQLx errors to StoreError.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Backend(format!(
                "database error in {} (code {}): {}",
                operation,
                code,
                db_err.message()
            ))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Backend(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Raw `users` row.
struct UserRow {
    id: i64,
    name: String,
    dob: NaiveDate,
}

impl UserRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Self> {
        let decode =
            |e: sqlx::Error| StoreError::Backend(format!("failed to decode user row: {e}"));
        Ok(Self {
            id: row.try_get("id").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            dob: row.try_get("dob").map_err(decode)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            name: row.name,
            date_of_birth: row.dob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(map_sqlx_error("get_by_id", sqlx::Error::RowNotFound).is_not_found());
    }

    #[test]
    fn pool_failures_map_to_backend() {
        match map_sqlx_error("list", sqlx::Error::PoolClosed) {
            StoreError::Backend(msg) => assert!(msg.contains("pool closed in list")),
            other => panic!("expected backend error, got {other:?}"),
        }
        assert!(matches!(
            map_sqlx_error("create", sqlx::Error::PoolTimedOut),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn other_driver_errors_are_not_not_found() {
        let err = map_sqlx_error("delete", sqlx::Error::Protocol("unexpected message".into()));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("delete"));
    }
}
