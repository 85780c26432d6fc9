use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::bank::workspace::WorkspaceError;
use crate::export::ExportError;
use crate::ingest::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Nothing to export")]
    EmptyResume,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("An import is already in progress")]
    ImportInProgress,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("No LLM is configured")]
    LlmUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Empty => AppError::EmptyInput(err.to_string()),
            ExtractError::NoSections
            | ExtractError::Unreadable(_)
            | ExtractError::Malformed(_)
            | ExtractError::Llm(_) => AppError::ParseFailed(err.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::EmptyResume => AppError::EmptyResume,
            ExportError::UnsupportedFormat(format) => AppError::UnsupportedFormat(format),
            ExportError::Pdf(_) | ExportError::Encoding(_) => {
                AppError::Internal(anyhow::anyhow!(err.to_string()))
            }
        }
    }
}

impl From<WorkspaceError> for AppError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::SectionNotFound(_) | WorkspaceError::SnippetNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            WorkspaceError::EmptyContent => AppError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::EmptyInput(msg) => (StatusCode::BAD_REQUEST, "EMPTY_INPUT", msg.clone()),
            AppError::ParseFailed(msg) => {
                tracing::warn!("Import parse failed: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PARSE_FAILED",
                    "We couldn't find any sections in that document".to_string(),
                )
            }
            AppError::EmptyResume => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_RESUME",
                "Add at least one section or snippet before exporting".to_string(),
            ),
            AppError::UnsupportedFormat(format) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported export format '{format}'"),
            ),
            AppError::ImportInProgress => (
                StatusCode::CONFLICT,
                "IMPORT_IN_PROGRESS",
                "Another import is still running".to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::LlmUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM_ERROR",
                "AI suggestions need ANTHROPIC_API_KEY to be configured".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
