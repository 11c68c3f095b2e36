//! Document upload, validation, text extraction, and CRUD.

pub mod extract;
pub mod handlers;
pub mod storage;

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{DocumentRow, DocumentType};
use crate::models::user::User;
use crate::state::AppState;

/// Validates, stores, extracts, and persists one uploaded document.
pub async fn upload_document(
    state: &AppState,
    user: &User,
    document_type: DocumentType,
    original_filename: &str,
    data: Vec<u8>,
) -> Result<DocumentRow, AppError> {
    let ext = storage::validate_upload(original_filename, data.len())?;
    let mime_type = storage::mime_for_extension(&ext);

    let stored = storage::save_file(&state.config.upload_dir, &ext, data).await?;

    // Extraction is blocking (pdf-extract walks the whole file); keep it off
    // the async worker. Failure is non-fatal: content_text stays NULL and
    // analysis start is blocked until the user re-uploads.
    let extract_path = stored.path.clone();
    let extract_mime = mime_type.to_string();
    let content_text = tokio::task::spawn_blocking(move || {
        extract::extract_text(&extract_path, &extract_mime)
    })
    .await
    .map_err(|e| AppError::Storage(format!("Extraction task failed: {e}")))?;

    if content_text.is_none() {
        warn!(
            "Text extraction failed for {} ({})",
            stored.filename, mime_type
        );
    }

    let row: DocumentRow = sqlx::query_as(
        r#"
        INSERT INTO documents
            (id, user_id, document_type, filename, original_filename,
             file_path, content_text, file_size, mime_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(document_type.as_str())
    .bind(&stored.filename)
    .bind(original_filename)
    .bind(&stored.path)
    .bind(&content_text)
    .bind(stored.size as i64)
    .bind(mime_type)
    .fetch_one(&state.db)
    .await?;

    Ok(row)
}

pub async fn get_user_documents(pool: &PgPool, user: &User) -> Result<Vec<DocumentRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM documents WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_document(
    pool: &PgPool,
    user: &User,
    document_id: Uuid,
) -> Result<Option<DocumentRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM documents WHERE id = $1 AND user_id = $2")
        .bind(document_id)
        .bind(user.id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Deletes a document row and its file. Returns false when the document
/// does not exist or is not owned by the user.
pub async fn delete_document(
    pool: &PgPool,
    user: &User,
    document_id: Uuid,
) -> Result<bool, AppError> {
    let document = match get_document(pool, user, document_id).await? {
        Some(doc) => doc,
        None => return Ok(false),
    };

    // File may already be gone; that is fine.
    if let Err(e) = tokio::fs::remove_file(&document.file_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {e}", document.file_path);
        }
    }

    sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
        .bind(document_id)
        .bind(user.id)
        .execute(pool)
        .await?;

    Ok(true)
}
