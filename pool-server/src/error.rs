use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pool_core::RepositoryError;
use pool_core::export::{SpreadsheetError, WhatsAppError};
use pool_core::validation::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::client_store::ClientStoreError;
use crate::draft_store::DraftStoreError;

/// Errors returned by handlers. Rendered as `{ "error": "<message>" }`.
#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The detail is logged; the client only sees the generic message.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl AppError {
    pub fn internal(
        message: impl Into<String>,
        detail: impl ToString,
    ) -> Self {
        AppError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(message) | AppError::NotFound(message) => message,
            AppError::Internal { message, detail } => {
                error!(%detail, "{message}");
                message
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ClientStoreError> for AppError {
    fn from(err: ClientStoreError) -> Self {
        match err {
            ClientStoreError::ClientNotFound | ClientStoreError::EstimateNotFound => {
                AppError::NotFound(err.to_string())
            }
            other => AppError::internal("Failed to save clients", other),
        }
    }
}

impl From<DraftStoreError> for AppError {
    fn from(err: DraftStoreError) -> Self {
        match err {
            DraftStoreError::UnknownKey(_) => AppError::NotFound(err.to_string()),
            DraftStoreError::Invalid(_) => AppError::BadRequest(err.to_string()),
            DraftStoreError::Io(_) => AppError::internal("Failed to save draft", err),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound("Estimate not found".to_string()),
            other => AppError::internal("Database error", other),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<WhatsAppError> for AppError {
    fn from(err: WhatsAppError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SpreadsheetError> for AppError {
    fn from(err: SpreadsheetError) -> Self {
        AppError::internal("Failed to build spreadsheet", err)
    }
}
