//! Axum route handlers for the Bank and Résumé APIs.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bank::import::import_text;
use crate::bank::workspace::{ImportReport, Workspace};
use crate::errors::AppError;
use crate::ingest::upload::document_text;
use crate::sections::{BankSection, Section, Snippet};
use crate::state::AppState;
use crate::suggest::improve_snippet;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceResumeRequest {
    pub sections: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddSectionRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSectionRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveSectionRequest {
    pub to_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct PlaceSnippetRequest {
    pub bank_section_title: String,
    pub snippet_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSnippetRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveSnippetRequest {
    pub to_section_id: String,
    pub to_index: usize,
}

/// Both containers after a mutation, so clients can re-render without a second call.
#[derive(Debug, Serialize)]
pub struct WorkspaceView {
    pub bank: Vec<BankSection>,
    pub resume: Vec<Section>,
}

impl From<&Workspace> for WorkspaceView {
    fn from(workspace: &Workspace) -> Self {
        Self {
            bank: workspace.bank().to_vec(),
            resume: workspace.resume().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceSnippetResponse {
    pub snippet: Snippet,
    #[serde(flatten)]
    pub workspace: WorkspaceView,
}

#[derive(Debug, Serialize)]
pub struct ReturnSnippetResponse {
    /// False when the bank already held the same content.
    pub rebanked: bool,
    #[serde(flatten)]
    pub workspace: WorkspaceView,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Bank
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/bank
pub async fn handle_get_bank(State(state): State<AppState>) -> Json<Vec<BankSection>> {
    Json(state.workspace.read().await.bank().to_vec())
}

/// POST /api/v1/bank/import
///
/// Parses raw document text and merges it into the bank.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportReport>, AppError> {
    let report = import_text(
        state.extractor.as_ref(),
        &state.workspace,
        &state.import_gate,
        &request.raw_text,
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/bank/upload
///
/// Multipart upload (field `file`). PDFs are converted to text, anything else is read
/// as UTF-8; the text then goes through the same path as `/bank/import`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportReport>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            upload = Some((file_name, bytes));
            break;
        }
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;
    info!("Received upload '{file_name}' ({} bytes)", bytes.len());

    // pdf-extract is CPU-bound and synchronous.
    let text = tokio::task::spawn_blocking(move || document_text(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("upload decoding task failed: {e}")))??;

    let report = import_text(
        state.extractor.as_ref(),
        &state.workspace,
        &state.import_gate,
        &text,
    )
    .await?;
    Ok(Json(report))
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Vec<Section>> {
    Json(state.workspace.read().await.resume().to_vec())
}

/// PUT /api/v1/resume
///
/// Replaces the résumé tree. Nested sections are flattened.
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Json(request): Json<ReplaceResumeRequest>,
) -> Json<Vec<Section>> {
    let mut workspace = state.workspace.write().await;
    Json(workspace.replace_resume(request.sections).to_vec())
}

/// POST /api/v1/resume/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    request: Option<Json<AddSectionRequest>>,
) -> (StatusCode, Json<Section>) {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let section = state
        .workspace
        .write()
        .await
        .add_section(request.title.as_deref());
    (StatusCode::CREATED, Json(section))
}

/// PATCH /api/v1/resume/sections/:id
pub async fn handle_rename_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Json(request): Json<RenameSectionRequest>,
) -> Result<Json<Section>, AppError> {
    let section = state
        .workspace
        .write()
        .await
        .rename_section(&section_id, &request.title)?;
    Ok(Json(section))
}

/// DELETE /api/v1/resume/sections/:id
///
/// The section's snippets are discarded, not returned to the bank.
pub async fn handle_remove_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.workspace.write().await.remove_section(&section_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resume/sections/:id/move
pub async fn handle_move_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Json(request): Json<MoveSectionRequest>,
) -> Result<Json<Vec<Section>>, AppError> {
    let mut workspace = state.workspace.write().await;
    workspace.move_section(&section_id, request.to_index)?;
    Ok(Json(workspace.resume().to_vec()))
}

/// POST /api/v1/resume/place
///
/// Moves a bank snippet into the résumé under a fresh id.
pub async fn handle_place_snippet(
    State(state): State<AppState>,
    Json(request): Json<PlaceSnippetRequest>,
) -> Result<Json<PlaceSnippetResponse>, AppError> {
    let mut workspace = state.workspace.write().await;
    let snippet = workspace.place_snippet(&request.bank_section_title, &request.snippet_id)?;
    Ok(Json(PlaceSnippetResponse {
        snippet,
        workspace: WorkspaceView::from(&*workspace),
    }))
}

/// POST /api/v1/resume/snippets/:id/return
pub async fn handle_return_snippet(
    State(state): State<AppState>,
    Path(snippet_id): Path<String>,
) -> Result<Json<ReturnSnippetResponse>, AppError> {
    let mut workspace = state.workspace.write().await;
    let rebanked = workspace.return_snippet(&snippet_id)?;
    Ok(Json(ReturnSnippetResponse {
        rebanked,
        workspace: WorkspaceView::from(&*workspace),
    }))
}

/// PATCH /api/v1/resume/snippets/:id
pub async fn handle_update_snippet(
    State(state): State<AppState>,
    Path(snippet_id): Path<String>,
    Json(request): Json<UpdateSnippetRequest>,
) -> Result<Json<Snippet>, AppError> {
    let snippet = state
        .workspace
        .write()
        .await
        .update_snippet(&snippet_id, &request.content)?;
    Ok(Json(snippet))
}

/// POST /api/v1/resume/snippets/:id/move
pub async fn handle_move_snippet(
    State(state): State<AppState>,
    Path(snippet_id): Path<String>,
    Json(request): Json<MoveSnippetRequest>,
) -> Result<Json<Vec<Section>>, AppError> {
    let mut workspace = state.workspace.write().await;
    workspace.move_snippet(&snippet_id, &request.to_section_id, request.to_index)?;
    Ok(Json(workspace.resume().to_vec()))
}

/// POST /api/v1/resume/snippets/:id/suggestions
///
/// Asks the LLM for rewrites. The snippet itself is not changed.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Path(snippet_id): Path<String>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let llm = state.llm.as_ref().ok_or(AppError::LlmUnavailable)?;
    let content = state
        .workspace
        .read()
        .await
        .snippet_content(&snippet_id)?
        .to_string();

    let suggestions = improve_snippet(llm, &content).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}
