use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::success;
use crate::client_store::ClientStoreError;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/clients",
        get(list_or_get)
            .post(create)
            .put(update)
            .delete(remove),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// No id matches no client.
fn required_id(query: IdQuery) -> Result<String, AppError> {
    query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ClientStoreError::ClientNotFound.into())
}

/// All clients, or one with `?id=`.
async fn list_or_get(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    match query.id {
        Some(id) => {
            let client = state.clients.get(&id).await?;
            Ok(Json(client).into_response())
        }
        None => {
            let clients = state.clients.list().await;
            debug!(count = clients.len(), "Listing clients");
            Ok(Json(clients).into_response())
        }
    }
}

async fn create(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Response, AppError> {
    let client = state.clients.create(&fields).await?;
    Ok((StatusCode::CREATED, Json(client)).into_response())
}

async fn update(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    Json(updates): Json<Map<String, Value>>,
) -> Result<Response, AppError> {
    let id = required_id(query)?;
    let client = state.clients.update(&id, &updates).await?;
    Ok(Json(client).into_response())
}

async fn remove(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, AppError> {
    let id = required_id(query)?;
    state.clients.delete(&id).await?;
    Ok(success())
}
