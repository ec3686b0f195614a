//! Data-access contract and its PostgreSQL implementation.
//!
//! # Table Schema
//!
//! See `sql/schema.sql`:
//!
//! ```sql
//! CREATE TABLE todo (
//!     id BIGSERIAL PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     done BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::PgConnection;

use crate::config::DbConfig;
use crate::db;
use crate::error::TodoError;
use crate::transaction::with_transaction;
use crate::types::{NewTodo, Todo};

/// DDL for the `todo` table.
pub const SCHEMA: &str = include_str!("../sql/schema.sql");

/// The four operations the HTTP layer needs. Implementations hold no
/// per-request state; the backing storage is the only source of truth.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Every record, in whatever order storage yields them.
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;

    async fn add(&self, todo: NewTodo) -> Result<(), TodoError>;

    /// Set `done` on `id`. `NotFound` if no row matched.
    async fn mark_done(&self, id: i64) -> Result<(), TodoError>;

    /// Remove `id`. `NotFound` if no row matched.
    async fn delete(&self, id: i64) -> Result<(), TodoError>;
}

/// PostgreSQL-backed store. Each call opens a fresh connection, runs one
/// statement in its own transaction, and closes the connection again.
#[derive(Debug, Clone)]
pub struct PostgresTodoStore {
    config: DbConfig,
}

impl PostgresTodoStore {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    /// Create the `todo` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), TodoError> {
        self.run(|conn| {
            Box::pin(async move {
                sqlx::query(SCHEMA)
                    .execute(&mut *conn)
                    .await
                    .map_err(TodoError::Query)?;
                Ok(())
            })
        })
        .await
    }

    async fn run<T, F>(&self, work: F) -> Result<T, TodoError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, TodoError>> + Send,
    {
        let mut connection = db::connect(&self.config).await?;
        let outcome = with_transaction(&mut connection, work).await;
        db::release(connection).await;
        outcome
    }

    /// Run a single UPDATE/DELETE and turn "no rows touched" into `NotFound`.
    async fn execute_for_id(&self, sql: &'static str, id: i64) -> Result<(), TodoError> {
        self.run(move |conn| {
            Box::pin(async move {
                let result = sqlx::query(sql)
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(TodoError::Query)?;
                if result.rows_affected() == 0 {
                    return Err(TodoError::NotFound { id });
                }
                Ok(())
            })
        })
        .await
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        self.run(|conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Todo>("SELECT id, title, done, created_at FROM todo")
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(TodoError::Query)
            })
        })
        .await
    }

    async fn add(&self, todo: NewTodo) -> Result<(), TodoError> {
        self.run(move |conn| {
            Box::pin(async move {
                sqlx::query("INSERT INTO todo (title, done, created_at) VALUES ($1, $2, $3)")
                    .bind(todo.title)
                    .bind(false)
                    .bind(todo.created_at)
                    .execute(&mut *conn)
                    .await
                    .map_err(TodoError::Query)?;
                Ok(())
            })
        })
        .await
    }

    async fn mark_done(&self, id: i64) -> Result<(), TodoError> {
        self.execute_for_id("UPDATE todo SET done = true WHERE id = $1", id)
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), TodoError> {
        self.execute_for_id("DELETE FROM todo WHERE id = $1", id).await
    }
}
