//! The todo record and its insert payload.
//!
//! # Design
//! `Todo` is both the row shape read back from storage (`sqlx::FromRow`) and
//! the JSON shape served over HTTP. The only divergence between the two is
//! the timestamp: the column is `created_at`, the JSON key is `created`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single todo item as stored in the `todo` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub done: bool,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload. The id is assigned by storage and `done` always starts
/// out `false`, so neither appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    /// Validates `title` and stamps the record with `created_at`.
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self { title, created_at })
    }
}

/// Only the empty string is rejected; whitespace is a legal title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

/// Parse a path segment into a todo id.
pub fn parse_id(raw: &str) -> Result<i64, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::InvalidId(raw.to_string()))
}
