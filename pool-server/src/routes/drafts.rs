use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::success;
use crate::draft_store::{DraftKey, DraftStoreError};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/drafts/{key}", get(fetch).put(store).delete(clear))
}

fn draft_key(key: &str) -> Result<DraftKey, AppError> {
    DraftKey::parse(key).ok_or_else(|| DraftStoreError::UnknownKey(key.to_string()).into())
}

async fn fetch(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key = draft_key(&key)?;
    state
        .drafts
        .get(key)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Draft not found".to_string()))
}

async fn store(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let key = draft_key(&key)?;
    state.drafts.put(key, &value).await?;
    Ok(success())
}

async fn clear(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key = draft_key(&key)?;
    state.drafts.clear(key).await?;
    Ok(success())
}
