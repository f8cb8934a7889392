//! Saved estimates in the repository.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pool_core::{ClientInfo, EstimateStatus, HistoryEstimate, NewHistoryEstimate};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::calculate::EstimateInput;
use super::success;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/history", get(list).post(save))
        .route("/api/history/{id}", get(fetch).put(update).delete(remove))
        .route("/api/history/{id}/duplicate", post(duplicate))
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(flatten)]
    pub input: EstimateInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRequest {
    pub name: Option<String>,
    pub status: Option<EstimateStatus>,
}

fn parse_status(status: Option<&str>) -> Result<Option<EstimateStatus>, AppError> {
    match status.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => EstimateStatus::parse(s)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{s}'"))),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<HistoryEstimate>>, AppError> {
    let status = parse_status(query.status.as_deref())?;
    Ok(Json(state.repo.list_estimates(status).await?))
}

/// Prices the request and stores it as a new draft.
async fn save(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Response, AppError> {
    let mut selection = request.input.priced_selection();
    if let Some(client_info) = request.client_info {
        selection.client_info = client_info;
    }
    let summary = request.input.summary(&selection);

    let mut estimate =
        NewHistoryEstimate::new(request.name, selection, summary.all_items(), summary.total())?;
    if let Some(author) = request.author.filter(|a| !a.trim().is_empty()) {
        estimate = estimate.with_author(author);
    }

    let saved = state.repo.create_estimate(estimate).await?;
    info!(id = saved.id, name = %saved.name, total = %saved.total, "Estimate saved");
    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<HistoryEstimate>, AppError> {
    Ok(Json(state.repo.get_estimate(id).await?))
}

/// Renames an estimate or moves it to another status.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<HistoryEstimate>, AppError> {
    let mut estimate = state.repo.get_estimate(id).await?;
    if let Some(name) = request.name {
        pool_core::validation::ensure_valid(&name, estimate.total)?;
        estimate.name = name.trim().to_string();
    }
    if let Some(status) = request.status {
        estimate.status = status;
    }

    let updated = state.repo.update_estimate(&estimate).await?;
    info!(id, status = updated.status.as_str(), "Estimate updated");
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.repo.delete_estimate(id).await?;
    info!(id, "Estimate deleted");
    Ok(success())
}

async fn duplicate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let original = state.repo.get_estimate(id).await?;
    let copy = state.repo.create_estimate(original.duplicate()).await?;
    info!(from = id, id = copy.id, "Estimate duplicated");
    Ok((StatusCode::CREATED, Json(copy)).into_response())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_filter_is_optional_and_checked() {
        assert_eq!(parse_status(None), Ok(None));
        assert_eq!(parse_status(Some("")), Ok(None));
        assert_eq!(parse_status(Some("completed")), Ok(Some(EstimateStatus::Completed)));
        assert_eq!(
            parse_status(Some("sent")),
            Err(AppError::BadRequest("Unknown status 'sent'".to_string()))
        );
    }
}
