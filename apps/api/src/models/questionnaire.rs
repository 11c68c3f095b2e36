use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Free-form background questionnaire responses.
/// At most one completed questionnaire is meaningfully used per user;
/// the latest by `created_at` wins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionnaireRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub responses: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
