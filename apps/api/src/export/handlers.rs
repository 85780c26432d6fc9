//! Axum route handlers for the Export API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{file_name, serialize, ExportFormat, FormatInfo};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub filename: Option<String>,
}

/// GET /api/v1/export/formats
pub async fn handle_list_formats() -> Json<Vec<FormatInfo>> {
    Json(ExportFormat::ALL.into_iter().map(FormatInfo::from).collect())
}

/// GET /api/v1/export/:format
///
/// Serializes the current résumé and returns it as a download.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse()?;
    let (aliases, sections) = {
        let workspace = state.workspace.read().await;
        (workspace.aliases().clone(), workspace.resume().to_vec())
    };

    let body = serialize(&aliases, &sections, format)?;
    let base = query
        .filename
        .as_deref()
        .unwrap_or(&state.config.export_filename);
    let name = file_name(base, format);
    info!("Exported {name} ({} bytes)", body.len());

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
