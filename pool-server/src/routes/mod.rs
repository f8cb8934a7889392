//! HTTP API.
//!
//! | Path                          | Methods                | Backed by        |
//! |-------------------------------|------------------------|------------------|
//! | `/api/health`                 | GET                    |                  |
//! | `/api/clients`                | GET POST PUT DELETE    | client file      |
//! | `/api/estimates`              | GET POST PUT DELETE    | client file      |
//! | `/api/history`                | GET POST               | repository       |
//! | `/api/history/{id}`           | GET PUT DELETE         | repository       |
//! | `/api/history/{id}/duplicate` | POST                   | repository       |
//! | `/api/catalog`, `?q=` search  | GET                    | repository       |
//! | `/api/calculate`              | POST                   | pure             |
//! | `/api/drafts/{key}`           | GET PUT DELETE         | drafts directory |
//! | `/api/export/{kind}`          | POST                   | pure / repository|
//! | `/api/log-level`              | PUT                    | logging          |
//!
//! Errors are `{ "error": "..." }` with status 400, 404 or 500.

pub mod calculate;
pub mod catalog;
pub mod clients;
pub mod drafts;
pub mod estimates;
pub mod export;
pub mod history;

use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::error::AppError;
use crate::logging;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/log-level", put(set_log_level))
        .merge(clients::routes())
        .merge(estimates::routes())
        .merge(history::routes())
        .merge(catalog::routes())
        .merge(calculate::routes())
        .merge(drafts::routes())
        .merge(export::routes())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct LogLevelRequest {
    level: String,
}

async fn set_log_level(Json(request): Json<LogLevelRequest>) -> Result<Json<Value>, AppError> {
    logging::set_log_level(&request.level).map_err(|e| AppError::BadRequest(e.to_string()))?;
    info!(level = %request.level, "Log level changed");
    Ok(Json(json!({ "success": true })))
}

/// `{ "success": true }`, returned by deletes.
pub(crate) fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
