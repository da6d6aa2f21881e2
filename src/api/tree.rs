//! `/api/tree` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::family::tree as ops;
use crate::family::types::NewPerson;

/// Body for `POST /tree/initialize`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitializeParams {
    /// One or two founders.
    pub parents: Vec<NewPerson>,
}

pub async fn show(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tree = state.run(|store| ops::load_tree(store)).await?;
    let body = match tree {
        Some(tree) => json!({ "success": true, "data": tree }),
        None => json!({
            "success": true,
            "data": null,
            "message": "No family tree exists yet",
            "availableEndpoints": [
                "POST /api/tree/initialize - Initialize new tree with root parents",
                "GET /api/persons - Get all persons",
                "POST /api/persons - Create new person",
            ],
        }),
    };
    Ok(Json(body))
}

pub async fn initialize(
    State(state): State<AppState>,
    payload: Result<Json<InitializeParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(params) =
        payload.map_err(|r| ApiError::bad_body("Invalid initialization data", r))?;
    let tree = state
        .run(move |store| ops::initialize_tree(store, params.parents))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": tree,
            "message": "Family tree initialized successfully",
        })),
    ))
}

pub async fn remove(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deleted = state.run(|store| ops::clear_tree(store)).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "deletedPersons": deleted },
        "message": "Family tree deleted successfully",
    })))
}

pub async fn integrity(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let report = state.run(|store| ops::audit(store)).await?;
    Ok(Json(json!({ "success": true, "data": report })))
}
