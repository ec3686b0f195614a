//! In-process `TodoStore` for development and tests.
//!
//! Ids come from a counter that only moves forward, so a deleted id is never
//! handed out again. Listing returns records in id order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::types::{NewTodo, Todo};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Todo>,
}

#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    table: RwLock<Table>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn add(&self, todo: NewTodo) -> Result<(), TodoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            Todo {
                id,
                title: todo.title,
                done: false,
                created_at: todo.created_at,
            },
        );
        Ok(())
    }

    async fn mark_done(&self, id: i64) -> Result<(), TodoError> {
        let mut table = self.table.write().await;
        let todo = table.rows.get_mut(&id).ok_or(TodoError::NotFound { id })?;
        todo.done = true;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), TodoError> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(TodoError::NotFound { id })
    }
}
