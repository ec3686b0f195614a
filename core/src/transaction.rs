//! Single-unit-of-work transaction bracket.
//!
//! # Design
//! [`with_transaction`] begins a transaction, hands the unit of work a
//! mutable borrow of the transaction's connection, and then ends the
//! transaction exactly once: commit on `Ok`, rollback on `Err`. A failed
//! rollback is logged and dropped so the caller always sees the error that
//! caused it. If the work panics or the returned future is dropped midway,
//! the `sqlx::Transaction` guard issues the rollback on drop.
//!
//! The helper is generic over any `sqlx::Connection` so it is exercised
//! against SQLite in tests and PostgreSQL in production.

use futures::future::BoxFuture;
use sqlx::{Connection, Database};

use crate::error::TodoError;

/// Run `work` inside a transaction on `connection`.
///
/// ```ignore
/// let affected = with_transaction(&mut connection, |tx| {
///     Box::pin(async move {
///         let result = sqlx::query("UPDATE todo SET done = true WHERE id = $1")
///             .bind(id)
///             .execute(&mut *tx)
///             .await
///             .map_err(TodoError::Query)?;
///         Ok(result.rows_affected())
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<C, T, F>(connection: &mut C, work: F) -> Result<T, TodoError>
where
    C: Connection,
    C::Database: Database<Connection = C>,
    T: Send,
    F: for<'c> FnOnce(&'c mut C) -> BoxFuture<'c, Result<T, TodoError>> + Send,
{
    let mut transaction = connection.begin().await.map_err(TodoError::Transaction)?;

    match work(&mut *transaction).await {
        Ok(value) => {
            transaction.commit().await.map_err(TodoError::Transaction)?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = transaction.rollback().await {
                tracing::warn!(%rollback_error, %error, "rollback failed after unit of work error");
            }
            Err(error)
        }
    }
}
