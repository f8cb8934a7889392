//! Documents built from an estimate.
//!
//! Every endpoint takes the same body. With `historyId` the saved estimate
//! is exported; otherwise the inline `clientInfo`, `items`, `total` and
//! `selection` are used. A missing `total` is the sum of the item totals.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Local, NaiveDate, Utc};
use pool_core::export::{
    ContractDocument, ContractTemplate, DescriptionInput, Descriptions, ProposalDocument,
    estimate_csv, spreadsheet, whatsapp,
};
use pool_core::{ClientInfo, EstimateItem, Selection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

const HTML: &str = "text/html; charset=utf-8";
const CSV: &str = "text/csv; charset=utf-8";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/export/whatsapp", post(whatsapp_link))
        .route("/api/export/proposal", post(proposal))
        .route("/api/export/contract", post(contract))
        .route("/api/export/spreadsheet", post(spreadsheet_csv))
        .route("/api/export/description", post(description))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentRequest {
    pub history_id: Option<i64>,
    pub client_info: ClientInfo,
    pub items: Vec<EstimateItem>,
    pub total: Option<Decimal>,
    /// Used for document numbers; defaults to the current time.
    pub estimate_id: Option<String>,
    pub selection: Selection,
    /// Contract only; the built-in template when absent.
    pub template: Option<ContractTemplate>,
}

/// What a document is rendered from.
struct Source {
    client: ClientInfo,
    items: Vec<EstimateItem>,
    total: Decimal,
    estimate_id: String,
    selection: Selection,
}

async fn resolve(
    state: &AppState,
    request: DocumentRequest,
) -> Result<Source, AppError> {
    if let Some(id) = request.history_id {
        let saved = state.repo.get_estimate(id).await?;
        let client = saved
            .client_info
            .unwrap_or_else(|| saved.selection.client_info.clone());
        return Ok(Source {
            client,
            items: saved.items,
            total: saved.total,
            estimate_id: saved.id.to_string(),
            selection: saved.selection,
        });
    }

    let total = request
        .total
        .unwrap_or_else(|| request.items.iter().map(|i| i.total).sum());
    let estimate_id = request
        .estimate_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Utc::now().timestamp_millis().to_string());

    Ok(Source {
        client: request.client_info,
        items: request.items,
        total,
        estimate_id,
        selection: request.selection,
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Body served as a download named `file_name`.
fn attachment(
    content_type: &'static str,
    file_name: &str,
    body: String,
) -> Result<Response, AppError> {
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::internal("Failed to build download", e))?;
    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct WhatsAppResponse {
    pub url: String,
    pub message: String,
}

async fn whatsapp_link(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<WhatsAppResponse>, AppError> {
    let source = resolve(&state, request).await?;
    let message =
        whatsapp::build_message(&source.client, source.total, &source.items, &state.company);
    let url = whatsapp::build_url(&source.client.phone, &message)?;
    info!(estimate_id = %source.estimate_id, "WhatsApp link built");
    Ok(Json(WhatsAppResponse { url, message }))
}

async fn proposal(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    let source = resolve(&state, request).await?;
    let document = ProposalDocument::new(
        &source.client,
        &source.items,
        source.total,
        &source.estimate_id,
        today(),
    );
    let html = document.render_html(&state.company);
    info!(number = %document.number, "Proposal exported");
    attachment(HTML, &format!("{}.html", document.file_stem()), html)
}

async fn contract(
    State(state): State<AppState>,
    Json(mut request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    let template = request.template.take().unwrap_or_default();
    let source = resolve(&state, request).await?;
    let document =
        ContractDocument::new(&source.client, source.total, &source.estimate_id, today());
    let html = document.render_html(&template, &state.company);
    info!(number = %document.number, template = %template.name, "Contract exported");
    attachment(HTML, &format!("{}.html", document.file_stem()), html)
}

async fn spreadsheet_csv(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    let source = resolve(&state, request).await?;
    let csv = estimate_csv(&source.items, source.total)?;
    info!(items = source.items.len(), "Spreadsheet exported");
    attachment(CSV, &spreadsheet::file_name(today()), csv)
}

async fn description(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<Descriptions>, AppError> {
    let source = resolve(&state, request).await?;
    let input = DescriptionInput::from_selection(&source.selection, source.total, today());
    Ok(Json(input.variations()))
}
