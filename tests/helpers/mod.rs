#![allow(dead_code)]

use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use family_tree::api::{self, AppState};
use family_tree::store::json_dir::JsonDirStore;
use family_tree::store::memory::MemoryStore;

pub const BODY_LIMIT: usize = 64 * 1024;

/// Router over a fresh in-memory store.
pub fn test_app() -> Router {
    api::router(AppState::new(Box::new(MemoryStore::new())), BODY_LIMIT)
}

/// Router over a JSON directory store rooted at `dir`.
pub fn disk_app(dir: &Path) -> Router {
    let store = JsonDirStore::open(dir).unwrap();
    api::router(AppState::new(Box::new(store)), BODY_LIMIT)
}

/// Send a request with an optional JSON body; returns status and parsed body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(body) => send_raw(app, method, uri, &body.to_string()).await,
        None => {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            dispatch(app, request).await
        }
    }
}

/// Send `raw` verbatim as an `application/json` body.
pub async fn send_raw(app: &Router, method: &str, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Create a person through the API and return the stored record.
pub async fn create_person(app: &Router, first: &str, last: &str, parents: &[&str]) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/persons",
        Some(json!({ "firstName": first, "lastName": last, "parentIds": parents })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"].clone()
}

/// Fetch a person; panics unless it exists.
pub async fn get_person(app: &Router, id: &str) -> Value {
    let (status, body) = send(app, "GET", &format!("/api/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::OK, "get failed: {body}");
    body["data"].clone()
}

pub fn id_of(person: &Value) -> String {
    person["id"].as_str().unwrap().to_string()
}

/// String entries of a JSON array field, e.g. `parentIds`.
pub fn ids(person: &Value, field: &str) -> Vec<String> {
    person[field]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}
