//! Axum route handlers for the Documents API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::auth::handlers::MessageResponse;
use crate::documents;
use crate::errors::AppError;
use crate::models::document::{DocumentRow, DocumentType};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentRow>,
}

/// POST /api/documents/upload
///
/// Multipart form: `document_type` (resume | job_description) and `file`.
pub async fn handle_upload(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<DocumentRow>, AppError> {
    let mut document_type: Option<DocumentType> = None;
    let mut filename: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        // name() borrows the field; copy it out before consuming the body.
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("document_type") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid document_type: {e}")))?;
                document_type = Some(
                    serde_json::from_value(serde_json::Value::String(raw.clone())).map_err(
                        |_| {
                            AppError::Validation(format!(
                                "document_type must be 'resume' or 'job_description', got '{raw}'"
                            ))
                        },
                    )?,
                );
            }
            Some("file") => {
                filename = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::PayloadTooLarge(format!("Failed to read file: {e}")))?;
                data = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let document_type =
        document_type.ok_or_else(|| AppError::Validation("document_type is required".into()))?;
    let filename = filename.ok_or_else(|| AppError::Validation("file is required".into()))?;
    let data = data.ok_or_else(|| AppError::Validation("file is required".into()))?;

    let row = documents::upload_document(&state, &user, document_type, &filename, data).await?;
    Ok(Json(row))
}

/// GET /api/documents
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DocumentListResponse>, AppError> {
    let docs = documents::get_user_documents(&state.db, &user).await?;
    Ok(Json(DocumentListResponse { documents: docs }))
}

/// GET /api/documents/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentRow>, AppError> {
    documents::get_document(&state.db, &user, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))
}

/// DELETE /api/documents/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !documents::delete_document(&state.db, &user, id).await? {
        return Err(AppError::NotFound("Document not found".to_string()));
    }
    Ok(Json(MessageResponse {
        message: "Document deleted successfully".to_string(),
    }))
}
