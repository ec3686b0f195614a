//! Error taxonomy for the todo service.
//!
//! # Design
//! Storage failures are split by the phase that failed (connecting, the
//! transaction bracket, or the statement itself) so the server can map them
//! without inspecting `sqlx::Error`. `NotFound` is produced when an update or
//! delete touches zero rows; it is not a database error.

use thiserror::Error;

/// Errors returned by the connection factory, the transaction helper and
/// every `TodoStore` operation.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Opening the connection or the liveness ping failed.
    #[error("cannot connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    /// `BEGIN` or `COMMIT` failed.
    #[error("transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),

    /// The statement failed, or a row could not be decoded.
    #[error("{0}")]
    Query(#[source] sqlx::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An update or delete affected no rows.
    #[error("id {id} is not found")]
    NotFound { id: i64 },
}

impl TodoError {
    /// True for the variants that originate in the database rather than in
    /// the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            TodoError::Connection(_) | TodoError::Transaction(_) | TodoError::Query(_)
        )
    }
}

/// Request input rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a title")]
    EmptyTitle,

    #[error("invalid id {0}")]
    InvalidId(String),
}
