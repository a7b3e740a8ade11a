//! Adopter handlers.

use super::parse_id;
use crate::error::AppError;
use crate::response::{created_with_message, ok_with_message, success_many, success_one_ok};
use crate::service::validation::body_to_map;
use crate::service::{AdopterInput, AdopterRegistry};
use crate::session::AuthContext;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>, auth: AuthContext) -> Result<impl IntoResponse, AppError> {
    let rows = AdopterRegistry::list(&state.pool, &auth).await?;
    Ok(success_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = AdopterInput::from_body(&body_to_map(body)?)?;
    let id = AdopterRegistry::create(&state.pool, &auth, &input).await?;
    let row = AdopterRegistry::get(&state.pool, &auth, id).await?;
    Ok(created_with_message(row, "New adopter application added successfully!"))
}

pub async fn read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = AdopterRegistry::get(&state.pool, &auth, parse_id(&id_str)?).await?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let input = AdopterInput::from_body(&body_to_map(body)?)?;
    AdopterRegistry::update(&state.pool, &auth, id, &input).await?;
    let row = AdopterRegistry::get(&state.pool, &auth, id).await?;
    Ok(ok_with_message(row, "Adopter information updated successfully!"))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    AdopterRegistry::delete(&state.pool, &auth, id).await?;
    Ok(ok_with_message(serde_json::json!({ "id": id }), "Adopter deleted successfully."))
}
