//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis;
use crate::auth::extractor::CurrentUser;
use crate::errors::AppError;
use crate::models::analysis::{DocumentAnalysisRow, IppStageProgressRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartAnalysisRequest {
    pub resume_document_id: Option<Uuid>,
    pub job_document_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct StartAnalysisResponse {
    pub analysis_id: Uuid,
    pub status: String,
    pub message: &'static str,
}

/// POST /api/analysis/start
///
/// Creates the analysis record and launches the LLM pipeline in the
/// background. Poll `GET /api/analysis/latest/status` for progress.
pub async fn handle_start(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<StartAnalysisRequest>,
) -> Result<Json<StartAnalysisResponse>, AppError> {
    let analysis = analysis::start_analysis(
        &state,
        &user,
        request.resume_document_id,
        request.job_document_id,
    )
    .await?;

    Ok(Json(StartAnalysisResponse {
        analysis_id: analysis.id,
        status: analysis.status,
        message: "Document analysis started. This may take 1-2 minutes to complete.",
    }))
}

/// GET /api/analysis/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentAnalysisRow>, AppError> {
    analysis::get_user_analysis(&state.db, &user, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
}

/// GET /api/analysis/:id/ipp-progress
///
/// Ignatian stage completion for one analysis. 404 until the pipeline
/// records the Context stage.
pub async fn handle_ipp_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<IppStageProgressRow>, AppError> {
    analysis::get_ipp_progress(&state.db, &user, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Stage progress not found".to_string()))
}

/// GET /api/analysis
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<DocumentAnalysisRow>>, AppError> {
    let analyses = analysis::get_user_analyses(&state.db, &user).await?;
    Ok(Json(analyses))
}

/// GET /api/analysis/latest/status
///
/// Polled by the client while the pipeline runs.
pub async fn handle_latest_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DocumentAnalysisRow>, AppError> {
    analysis::get_latest_user_analysis(&state.db, &user)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No analyses found".to_string()))
}
