//! Mapping from `TodoError` to HTTP responses.
//!
//! Every error becomes a `text/plain` body. An empty title is reported with
//! its bare message; everything else is prefixed with `error `.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use todo_core::{TodoError, ValidationError};

use crate::config::StatusPolicy;

pub fn error_body(error: &TodoError) -> String {
    match error {
        TodoError::Validation(ValidationError::EmptyTitle) => error.to_string(),
        _ => format!("error {error}"),
    }
}

pub fn status_for(policy: StatusPolicy, error: &TodoError) -> StatusCode {
    match policy {
        StatusPolicy::AlwaysOk => StatusCode::OK,
        StatusPolicy::Typed => match error {
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound { .. } => StatusCode::NOT_FOUND,
            TodoError::Connection(_) | TodoError::Transaction(_) | TodoError::Query(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
    }
}

pub fn error_response(policy: StatusPolicy, error: TodoError) -> Response {
    if error.is_storage() {
        tracing::warn!(%error, "storage operation failed");
    } else {
        tracing::info!(%error, "request rejected");
    }
    (status_for(policy, &error), error_body(&error)).into_response()
}
