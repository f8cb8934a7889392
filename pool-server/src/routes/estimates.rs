//! Estimates saved against a client in the client file.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::success;
use crate::client_store::EstimateWithCustomer;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/estimates",
        get(list).post(create).put(update).delete(remove),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub client_id: String,
    #[serde(default)]
    pub estimate: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub client_id: String,
    pub estimate_id: String,
    #[serde(default)]
    pub updates: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub client_id: String,
    pub estimate_id: String,
}

async fn list(State(state): State<AppState>) -> Json<Vec<EstimateWithCustomer>> {
    Json(state.clients.all_estimates().await)
}

async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> Result<Response, AppError> {
    let estimate = state
        .clients
        .add_estimate(&request.client_id, &request.estimate)
        .await?;
    Ok((StatusCode::CREATED, Json(estimate)).into_response())
}

async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Result<Response, AppError> {
    let estimate = state
        .clients
        .update_estimate(&request.client_id, &request.estimate_id, &request.updates)
        .await?;
    Ok(Json(estimate).into_response())
}

async fn remove(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, AppError> {
    state
        .clients
        .delete_estimate(&query.client_id, &query.estimate_id)
        .await?;
    Ok(success())
}
