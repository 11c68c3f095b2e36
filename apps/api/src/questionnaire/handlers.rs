//! Axum route handlers for the background questionnaire.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::errors::AppError;
use crate::models::questionnaire::QuestionnaireRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionnairePayload {
    pub responses: Value,
    #[serde(default)]
    pub is_complete: bool,
}

async fn latest_completed(pool: &PgPool, user_id: Uuid) -> Result<Option<QuestionnaireRow>, AppError> {
    let row = sqlx::query_as(
        r#"
        SELECT * FROM user_background_questionnaires
        WHERE user_id = $1 AND completed_at IS NOT NULL
        ORDER BY created_at DESC LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// POST /api/questionnaire/background
///
/// A user keeps at most one completed questionnaire: when one exists it is
/// updated in place, otherwise a new row is inserted.
pub async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<QuestionnairePayload>,
) -> Result<Json<QuestionnaireRow>, AppError> {
    if let Some(existing) = latest_completed(&state.db, user.id).await? {
        let row = update_row(&state.db, existing.id, user.id, &payload).await?;
        return Ok(Json(row));
    }

    let completed_at = payload.is_complete.then(Utc::now);
    let row: QuestionnaireRow = sqlx::query_as(
        r#"
        INSERT INTO user_background_questionnaires (id, user_id, responses, completed_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&payload.responses)
    .bind(completed_at)
    .fetch_one(&state.db)
    .await?;

    info!("Created background questionnaire {} for user {}", row.id, user.id);
    Ok(Json(row))
}

/// GET /api/questionnaire/background/latest
///
/// Latest questionnaire by creation time; null body when none exists.
pub async fn handle_latest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Option<QuestionnaireRow>>, AppError> {
    let row = sqlx::query_as(
        r#"
        SELECT * FROM user_background_questionnaires
        WHERE user_id = $1
        ORDER BY created_at DESC LIMIT 1
        "#,
    )
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;
    Ok(Json(row))
}

/// PUT /api/questionnaire/background/:id
pub async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionnairePayload>,
) -> Result<Json<QuestionnaireRow>, AppError> {
    let existing: Option<QuestionnaireRow> =
        sqlx::query_as("SELECT * FROM user_background_questionnaires WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;

    if existing.is_none() {
        return Err(AppError::NotFound("Questionnaire not found".to_string()));
    }

    let row = update_row(&state.db, id, user.id, &payload).await?;
    info!("Updated background questionnaire {} for user {}", id, user.id);
    Ok(Json(row))
}

async fn update_row(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    payload: &QuestionnairePayload,
) -> Result<QuestionnaireRow, AppError> {
    // completed_at is only ever set forward, never cleared.
    let row: QuestionnaireRow = sqlx::query_as(
        r#"
        UPDATE user_background_questionnaires
        SET responses = $3, updated_at = now(),
            completed_at = CASE WHEN $4 THEN now() ELSE completed_at END
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&payload.responses)
    .bind(payload.is_complete)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
