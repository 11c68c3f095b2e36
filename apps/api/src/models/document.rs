use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The two document kinds the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    JobDescription,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::JobDescription => "job_description",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: String,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    /// Extracted plain text; NULL when extraction failed.
    pub content_text: Option<String>,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_serde_snake_case() {
        let t: DocumentType = serde_json::from_str("\"job_description\"").unwrap();
        assert_eq!(t, DocumentType::JobDescription);
        assert_eq!(t.as_str(), "job_description");
    }
}
