//! Document analysis — record creation, background pipeline, queries.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod steps;

use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::pipeline::{spawn_analysis, AnalysisJob};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisStatus, DocumentAnalysisRow, IppStageProgressRow};
use crate::models::document::{DocumentRow, DocumentType};
use crate::models::user::User;
use crate::state::AppState;

/// Validates document ownership, creates the pending analysis record, and
/// kicks off the background pipeline. Returns the pending row immediately.
pub async fn start_analysis(
    state: &AppState,
    user: &User,
    resume_document_id: Option<Uuid>,
    job_document_id: Option<Uuid>,
) -> Result<DocumentAnalysisRow, AppError> {
    if resume_document_id.is_none() && job_document_id.is_none() {
        return Err(AppError::Validation(
            "At least one of resume_document_id or job_document_id is required".to_string(),
        ));
    }

    let resume_text = match resume_document_id {
        Some(id) => Some(owned_document_text(&state.db, user, id, DocumentType::Resume).await?),
        None => None,
    };
    let job_text = match job_document_id {
        Some(id) => {
            Some(owned_document_text(&state.db, user, id, DocumentType::JobDescription).await?)
        }
        None => None,
    };

    let analysis: DocumentAnalysisRow = sqlx::query_as(
        r#"
        INSERT INTO document_analyses
            (id, user_id, resume_document_id, job_document_id, status, progress_step)
        VALUES ($1, $2, $3, $4, $5, 0)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(resume_document_id)
    .bind(job_document_id)
    .bind(AnalysisStatus::Pending.as_str())
    .fetch_one(&state.db)
    .await?;

    spawn_analysis(
        state.db.clone(),
        state.llm.clone(),
        AnalysisJob {
            analysis_id: analysis.id,
            user_id: user.id,
            resume_text,
            job_text,
        },
    );

    Ok(analysis)
}

/// Loads a document, checks ownership and type, and returns its extracted
/// text. Documents whose extraction failed block analysis start.
async fn owned_document_text(
    pool: &PgPool,
    user: &User,
    document_id: Uuid,
    expected_type: DocumentType,
) -> Result<String, AppError> {
    let doc: Option<DocumentRow> = sqlx::query_as(
        "SELECT * FROM documents WHERE id = $1 AND user_id = $2 AND document_type = $3",
    )
    .bind(document_id)
    .bind(user.id)
    .bind(expected_type.as_str())
    .fetch_optional(pool)
    .await?;

    let doc = doc.ok_or_else(|| {
        AppError::Validation("Documents not found or don't belong to user".to_string())
    })?;

    doc.content_text
        .ok_or_else(|| AppError::Validation("Document text content not available".to_string()))
}

pub async fn get_user_analysis(
    pool: &PgPool,
    user: &User,
    analysis_id: Uuid,
) -> Result<Option<DocumentAnalysisRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM document_analyses WHERE id = $1 AND user_id = $2")
        .bind(analysis_id)
        .bind(user.id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_latest_user_analysis(
    pool: &PgPool,
    user: &User,
) -> Result<Option<DocumentAnalysisRow>, AppError> {
    let row = sqlx::query_as(
        "SELECT * FROM document_analyses WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user.id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Stage progress for one analysis. Absent until the pipeline has written
/// the Context stage row.
pub async fn get_ipp_progress(
    pool: &PgPool,
    user: &User,
    analysis_id: Uuid,
) -> Result<Option<IppStageProgressRow>, AppError> {
    let row = sqlx::query_as(
        "SELECT * FROM ipp_stage_progress WHERE analysis_id = $1 AND user_id = $2",
    )
    .bind(analysis_id)
    .bind(user.id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_user_analyses(
    pool: &PgPool,
    user: &User,
) -> Result<Vec<DocumentAnalysisRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM document_analyses WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
