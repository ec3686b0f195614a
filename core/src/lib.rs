//! Storage core for the todo service.
//!
//! # Overview
//! Owns everything below the HTTP layer: the `Todo` record, the PostgreSQL
//! connection factory, the transaction bracket every statement runs in, and
//! the `TodoStore` contract the server calls into.
//!
//! # Design
//! - No pool. `PostgresTodoStore` opens a connection per operation, runs a
//!   single statement through `with_transaction`, and closes it again.
//! - `with_transaction` guarantees exactly one commit or rollback per unit of
//!   work; a failed rollback never replaces the error that triggered it.
//! - `InMemoryTodoStore` implements the same contract for development and
//!   for tests that should not need a database.
//! - Configuration is an explicit `DbConfig` value; nothing is read from
//!   globals after startup.

pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod store;
pub mod transaction;
pub mod types;

pub use config::{ConfigError, DbConfig};
pub use error::{TodoError, ValidationError};
pub use memory::InMemoryTodoStore;
pub use store::{PostgresTodoStore, TodoStore};
pub use transaction::with_transaction;
pub use types::{parse_id, validate_title, NewTodo, Todo};
