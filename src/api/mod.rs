//! HTTP surface: axum router, shared state, and the JSON envelope.
//!
//! Every response carries `success`. Failures use
//! `{ "success": false, "error": { "code", "message", "details"? } }`, with the
//! status chosen from the [`FamilyError`] variant.

pub mod persons;
pub mod tree;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, OriginalUri, Request};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::family::error::{self, FamilyError};
use crate::family::validation::FieldError;
use crate::store::PersonStore;

/// Shared handler state. The store sits behind a `Mutex`, so requests in one
/// process are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Box<dyn PersonStore>>>,
}

impl AppState {
    pub fn new(store: Box<dyn PersonStore>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` against the store on the blocking pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut dyn PersonStore) -> error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store
                .lock()
                .map_err(|e| FamilyError::Internal(format!("store lock poisoned: {e}")))?;
            f(&mut **guard)
        })
        .await
        .map_err(|e| FamilyError::Internal(format!("store task failed: {e}")))?
        .map_err(ApiError::from)
    }
}

/// Build the full application router, mounted under `/api`.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/persons", get(persons::list).post(persons::create))
        .route(
            "/persons/{id}",
            get(persons::show).put(persons::update).delete(persons::remove),
        )
        .route("/persons/{id}/children", post(persons::add_child))
        .route("/persons/{id}/children/{child_id}", delete(persons::remove_child))
        .route("/persons/{id}/ancestors", get(persons::ancestors))
        .route("/persons/{id}/descendants", get(persons::descendants))
        .route("/tree", get(tree::show).delete(tree::remove))
        .route("/tree/initialize", post(tree::initialize))
        .route("/tree/integrity", get(tree::integrity))
        .fallback(not_found);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Error half of every handler.
#[derive(Debug)]
pub enum ApiError {
    Family(FamilyError),
    RouteNotFound(String),
}

impl From<FamilyError> for ApiError {
    fn from(err: FamilyError) -> Self {
        Self::Family(err)
    }
}

impl ApiError {
    /// Map a rejected JSON body to a `VALIDATION_ERROR`.
    pub fn bad_body(message: &str, rejection: JsonRejection) -> Self {
        Self::Family(FamilyError::validation(
            message,
            vec![FieldError::new("body", rejection.body_text())],
        ))
    }

    fn status(&self) -> StatusCode {
        let Self::Family(err) = self else {
            return StatusCode::NOT_FOUND;
        };
        match err {
            FamilyError::PersonNotFound(_)
            | FamilyError::ParentNotFound(_)
            | FamilyError::ChildNotFound(_) => StatusCode::NOT_FOUND,
            FamilyError::Storage(_) | FamilyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FamilyError::Validation { .. }
            | FamilyError::UnknownParent(_)
            | FamilyError::TooManyParents(_)
            | FamilyError::RelationshipExists
            | FamilyError::RelationshipNotExists
            | FamilyError::CircularRelationship
            | FamilyError::InvalidDeletionStrategy(_)
            | FamilyError::TreeAlreadyExists => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::RouteNotFound(path) => json!({
                "code": "NOT_FOUND",
                "message": format!("API endpoint {path} not found"),
            }),
            Self::Family(err) => {
                // Server-side details (paths, OS errors) stay in the log.
                let message = match err {
                    FamilyError::Storage(_) => "Storage operation failed".to_string(),
                    FamilyError::Internal(_) => "Internal server error".to_string(),
                    other => other.to_string(),
                };
                if status.is_server_error() {
                    tracing::error!(error = %err, code = err.code(), "request failed");
                }
                let mut body = json!({ "code": err.code(), "message": message });
                if let FamilyError::Validation { details, .. } = err {
                    body["details"] = json!(details);
                }
                body
            }
        };
        (status, Json(json!({ "success": false, "error": body }))).into_response()
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Family Tree API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
