use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an analysis run. Transitions are monotonic:
/// pending → processing → {completed, failed}. Nothing moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentAnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Either document may be absent — resume-only and job-only flows exist.
    pub resume_document_id: Option<Uuid>,
    pub job_document_id: Option<Uuid>,
    pub resume_analysis: Option<Value>,
    pub job_analysis: Option<Value>,
    pub connections_analysis: Option<Value>,
    pub context_summary: Option<String>,
    pub role_fit_narrative: Option<String>,
    pub strengths: Option<String>,
    pub gaps: Option<String>,
    pub status: String,
    pub progress_step: i32,
    pub progress_message: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Per-analysis record of which Ignatian pedagogy stages are complete.
/// The pipeline populates the context stage; later stages are written by
/// future stage endpoints and are schema-only today.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IppStageProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub analysis_id: Uuid,
    pub context_completed: bool,
    pub context_completed_at: Option<DateTime<Utc>>,
    pub experience_completed: bool,
    pub experience_completed_at: Option<DateTime<Utc>>,
    pub reflection_completed: bool,
    pub reflection_completed_at: Option<DateTime<Utc>>,
    pub action_completed: bool,
    pub action_completed_at: Option<DateTime<Utc>>,
    pub evaluation_completed: bool,
    pub evaluation_completed_at: Option<DateTime<Utc>>,
    pub experience_data: Option<Value>,
    pub reflection_data: Option<Value>,
    pub action_data: Option<Value>,
    pub evaluation_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_snake_case() {
        let s: AnalysisStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(s, AnalysisStatus::Processing);
        assert_eq!(s.as_str(), "processing");
    }
}
