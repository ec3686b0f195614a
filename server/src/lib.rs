//! HTTP front end for the todo service.
//!
//! | Method | Path         | Success body        |
//! |--------|--------------|---------------------|
//! | GET    | `/`          | `welcome`           |
//! | GET    | `/todo/`     | JSON array of todos |
//! | POST   | `/todo/`     | `add todo ok`       |
//! | POST   | `/todo/{id}` | `done todo <id>`    |
//! | DELETE | `/todo/{id}` | `delete todo <id>`  |
//!
//! Failures are rendered by [`response::error_response`] according to the
//! configured [`StatusPolicy`].

pub mod config;
pub mod response;

use std::{future::Future, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use todo_core::{
    parse_id, InMemoryTodoStore, NewTodo, PostgresTodoStore, TodoError, TodoStore,
};

pub use config::{AppConfig, StatusPolicy, StorageMode};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TodoStore>,
    status_policy: StatusPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, status_policy: StatusPolicy) -> Self {
        Self {
            store,
            status_policy,
        }
    }

    /// Fresh in-memory store with the default status policy.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTodoStore::new()), StatusPolicy::default())
    }

    /// Build the store selected by `config`. No connection is opened here;
    /// the PostgreSQL store connects per request.
    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn TodoStore> = match config.storage {
            StorageMode::Postgres => Arc::new(PostgresTodoStore::new(config.db.clone())),
            StorageMode::InMemory => Arc::new(InMemoryTodoStore::new()),
        };
        Self::new(store, config.status_policy)
    }

    fn fail(&self, error: TodoError) -> Response {
        response::error_response(self.status_policy, error)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleForm {
    #[serde(default)]
    pub title: String,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/todo", get(list_todos).post(add_todo))
        .route("/todo/", get(list_todos).post(add_todo))
        .route("/todo/{id}", post(done_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run<S>(listener: TcpListener, state: AppState, shutdown: S) -> Result<(), std::io::Error>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn welcome() -> &'static str {
    "welcome"
}

async fn list_todos(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(todos) => Json(todos).into_response(),
        Err(error) => state.fail(error),
    }
}

/// A form body is authoritative even when its title is empty; the query
/// string is only consulted when the body is not a form.
async fn add_todo(
    State(state): State<AppState>,
    query: Result<Query<TitleForm>, QueryRejection>,
    form: Result<Form<TitleForm>, FormRejection>,
) -> Response {
    let title = match form {
        Ok(Form(form)) => form.title,
        Err(_) => query.map(|Query(query)| query.title).unwrap_or_default(),
    };

    let todo = match NewTodo::new(title, Utc::now()) {
        Ok(todo) => todo,
        Err(error) => return state.fail(error.into()),
    };

    match state.store.add(todo).await {
        Ok(()) => "add todo ok".into_response(),
        Err(error) => state.fail(error),
    }
}

async fn done_todo(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(error) => return state.fail(error.into()),
    };
    match state.store.mark_done(id).await {
        Ok(()) => format!("done todo {raw_id}").into_response(),
        Err(error) => state.fail(error),
    }
}

async fn delete_todo(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(error) => return state.fail(error.into()),
    };
    match state.store.delete(id).await {
        Ok(()) => format!("delete todo {raw_id}").into_response(),
        Err(error) => state.fail(error),
    }
}
