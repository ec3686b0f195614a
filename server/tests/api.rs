use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use todo_core::{InMemoryTodoStore, Todo};
use todo_server::{app, AppState, StatusPolicy};
use tower::ServiceExt;

fn memory_app(policy: StatusPolicy) -> Router {
    app(AppState::new(Arc::new(InMemoryTodoStore::new()), policy))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

fn bare(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Send one request through a clone of `app` and return status and body text.
async fn send(app: &Router, request: Request<String>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    (status, body_text(resp).await)
}

async fn list(app: &Router) -> Vec<Todo> {
    let resp = app.clone().oneshot(get("/todo/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- welcome ---

#[tokio::test]
async fn root_says_welcome() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "welcome");
}

// --- list ---

#[tokio::test]
async fn list_todos_empty_is_json_array() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let resp = app.clone().oneshot(get("/todo/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_text(resp).await, "[]");
}

#[tokio::test]
async fn list_without_trailing_slash_is_routed() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, body) = send(&app, get("/todo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

// --- add ---

#[tokio::test]
async fn add_todo_from_form_body() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, body) = send(&app, form_request("/todo/", "title=Buy+milk")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "add todo ok");

    let todos = list(&app).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Buy milk");
    assert!(!todos[0].done);
}

#[tokio::test]
async fn add_todo_from_query_string() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (_, body) = send(&app, bare("POST", "/todo/?title=From%20query")).await;

    assert_eq!(body, "add todo ok");
    assert_eq!(list(&app).await[0].title, "From query");
}

#[tokio::test]
async fn empty_form_title_is_not_replaced_by_query() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (_, body) = send(&app, form_request("/todo/?title=from-query", "title=")).await;

    assert_eq!(body, "Please enter a title");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn form_title_wins_over_query() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    send(&app, form_request("/todo/?title=from-query", "title=from-body")).await;

    assert_eq!(list(&app).await[0].title, "from-body");
}

#[tokio::test]
async fn add_todo_served_json_uses_created_key() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    send(&app, form_request("/todo/", "title=Shape")).await;

    let resp = app.clone().oneshot(get("/todo/")).await.unwrap();
    let json: serde_json::Value = body_json(resp).await;
    let record = &json[0];
    assert_eq!(record["id"], 1);
    assert_eq!(record["title"], "Shape");
    assert_eq!(record["done"], false);
    assert!(record["created"].is_string());
}

#[tokio::test]
async fn add_empty_title_is_rejected_without_storage_change() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    send(&app, form_request("/todo/", "title=Existing")).await;
    let before = list(&app).await;

    for request in [
        form_request("/todo/", "title="),
        form_request("/todo/", ""),
        bare("POST", "/todo/"),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Please enter a title");
    }

    assert_eq!(list(&app).await, before);
}

// --- done ---

#[tokio::test]
async fn done_todo_marks_record() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    send(&app, form_request("/todo/", "title=Walk+dog")).await;
    let original = list(&app).await.remove(0);

    let (status, body) = send(&app, bare("POST", "/todo/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "done todo 1");

    let updated = list(&app).await.remove(0);
    assert!(updated.done);
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn confirmations_echo_the_path_segment() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    send(&app, form_request("/todo/", "title=Padded")).await;

    let (_, body) = send(&app, bare("POST", "/todo/001")).await;
    assert_eq!(body, "done todo 001");
    assert!(list(&app).await[0].done);

    let (_, body) = send(&app, bare("DELETE", "/todo/01")).await;
    assert_eq!(body, "delete todo 01");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn done_todo_not_found() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, body) = send(&app, bare("POST", "/todo/42")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "error id 42 is not found");
}

#[tokio::test]
async fn done_todo_bad_id() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, body) = send(&app, bare("POST", "/todo/not-a-number")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "error invalid id not-a-number");
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, body) = send(&app, bare("DELETE", "/todo/7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "error id 7 is not found");
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = memory_app(StatusPolicy::AlwaysOk);
    let (status, _) = send(&app, bare("PUT", "/todo/1")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// --- typed status codes ---

#[tokio::test]
async fn typed_policy_sets_status_but_keeps_body() {
    let app = memory_app(StatusPolicy::Typed);

    let (status, body) = send(&app, form_request("/todo/", "title=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Please enter a title");

    let (status, body) = send(&app, bare("POST", "/todo/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "error invalid id abc");

    let (status, body) = send(&app, bare("DELETE", "/todo/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "error id 3 is not found");

    let (status, body) = send(&app, form_request("/todo/", "title=ok")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "add todo ok");
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = memory_app(StatusPolicy::AlwaysOk);

    // add
    let (_, body) = send(&app, form_request("/todo/", "title=Walk+dog")).await;
    assert_eq!(body, "add todo ok");
    let todos = list(&app).await;
    assert_eq!(todos.len(), 1);
    let id = todos[0].id;

    // done
    let (_, body) = send(&app, bare("POST", &format!("/todo/{id}"))).await;
    assert_eq!(body, format!("done todo {id}"));
    assert!(list(&app).await[0].done);

    // delete, from the done state
    let (_, body) = send(&app, bare("DELETE", &format!("/todo/{id}"))).await;
    assert_eq!(body, format!("delete todo {id}"));
    assert!(list(&app).await.is_empty());

    // second delete and done after delete both miss
    let (_, body) = send(&app, bare("DELETE", &format!("/todo/{id}"))).await;
    assert_eq!(body, format!("error id {id} is not found"));
    let (_, body) = send(&app, bare("POST", &format!("/todo/{id}"))).await;
    assert_eq!(body, format!("error id {id} is not found"));

    // a new record gets a fresh id
    send(&app, form_request("/todo/", "title=Next")).await;
    let todos = list(&app).await;
    assert_eq!(todos.len(), 1);
    assert_ne!(todos[0].id, id);
}

#[tokio::test]
async fn concurrent_adds_each_land_once() {
    let app = memory_app(StatusPolicy::AlwaysOk);

    let (a, b) = tokio::join!(
        send(&app, form_request("/todo/", "title=a")),
        send(&app, form_request("/todo/", "title=b")),
    );
    assert_eq!(a.1, "add todo ok");
    assert_eq!(b.1, "add todo ok");

    let todos = list(&app).await;
    assert_eq!(todos.len(), 2);
    assert_eq!(todos.iter().filter(|t| t.title == "a").count(), 1);
    assert_eq!(todos.iter().filter(|t| t.title == "b").count(), 1);
    assert_ne!(todos[0].id, todos[1].id);
}
