//! `/api/persons` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::family::links;
use crate::family::persons::{self as ops, parse_strategy};
use crate::family::types::{NewPerson, PersonUpdate};

/// Query string for `DELETE /persons/{id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// `orphan` (default) or `cascade`.
    pub strategy: Option<String>,
}

/// Body for `POST /persons/{id}/children`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChildParams {
    pub child_id: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let persons = state.run(|store| ops::list_persons(store)).await?;
    Ok(Json(json!({
        "success": true,
        "data": persons,
        "count": persons.len(),
    })))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let person = state.run(move |store| ops::find_person(store, &id)).await?;
    Ok(Json(json!({ "success": true, "data": person })))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewPerson>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(input) = payload.map_err(|r| ApiError::bad_body("Invalid person data", r))?;
    let person = state.run(move |store| ops::add_person(store, input)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": person,
            "message": "Person created successfully",
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PersonUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(update) = payload.map_err(|r| ApiError::bad_body("Invalid update data", r))?;
    let person = state
        .run(move |store| ops::edit_person(store, &id, update))
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": person,
        "message": "Person updated successfully",
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .run(move |store| {
            ops::find_person(store, &id)?;
            let strategy = parse_strategy(params.strategy.as_deref())?;
            ops::remove_person(store, &id, strategy)
        })
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": outcome,
        "message": "Person deleted successfully",
    })))
}

pub async fn add_child(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AddChildParams>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(params) = payload.map_err(|r| ApiError::bad_body("Invalid child ID format", r))?;
    let outcome = state
        .run(move |store| links::link_child(store, &id, &params.child_id))
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": outcome,
        "message": "Child relationship added successfully",
    })))
}

pub async fn remove_child(
    State(state): State<AppState>,
    Path((id, child_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .run(move |store| links::unlink_child(store, &id, &child_id))
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": outcome,
        "message": "Child relationship removed successfully",
    })))
}

pub async fn ancestors(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let persons = state.run(move |store| ops::ancestors_of(store, &id)).await?;
    Ok(Json(json!({
        "success": true,
        "data": persons,
        "count": persons.len(),
    })))
}

pub async fn descendants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let persons = state.run(move |store| ops::descendants_of(store, &id)).await?;
    Ok(Json(json!({
        "success": true,
        "data": persons,
        "count": persons.len(),
    })))
}
