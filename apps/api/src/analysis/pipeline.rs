//! Background analysis pipeline.
//!
//! Flow: claim (pending → processing) → analyze resume → analyze job →
//! find connections → context summary → completed, with the progress
//! step/message pair updated after every stage so the client can poll.
//!
//! Status is monotonic: pending → processing → {completed, failed}. The
//! claim and the terminal writes are guarded so no path moves it backward.
//! LLM failures degrade per step (see `steps`); only database errors mark
//! the run failed.

use serde_json::Value;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::steps::{
    analyze_job_description, analyze_resume, derive_text_fields, find_connections,
    generate_context_summary,
};
use crate::llm_client::LlmClient;
use crate::models::analysis::AnalysisStatus;

pub const PROGRESS_QUEUED: (i32, &str) = (0, "Starting analysis");
pub const PROGRESS_RESUME: (i32, &str) = (1, "Resume analyzed");
pub const PROGRESS_JOB: (i32, &str) = (2, "Job description analyzed");
pub const PROGRESS_CONNECTIONS: (i32, &str) = (3, "Connections identified");
pub const PROGRESS_DONE: (i32, &str) = (4, "Analysis complete");

/// Inputs captured at start time. Document text is snapshotted up front so
/// the background task does not race document deletion.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub analysis_id: Uuid,
    pub user_id: Uuid,
    pub resume_text: Option<String>,
    pub job_text: Option<String>,
}

/// Launches the pipeline on a background task. The handler returns the
/// pending record immediately; clients poll for progress.
pub fn spawn_analysis(pool: PgPool, llm: LlmClient, job: AnalysisJob) {
    tokio::spawn(async move {
        let analysis_id = job.analysis_id;
        if let Err(e) = run_pipeline(&pool, &llm, job).await {
            error!("Analysis {analysis_id} failed: {e:#}");
            if let Err(e) = mark_failed(&pool, analysis_id, &e.to_string()).await {
                error!("Could not mark analysis {analysis_id} failed: {e}");
            }
        }
    });
}

async fn run_pipeline(pool: &PgPool, llm: &LlmClient, job: AnalysisJob) -> Result<(), sqlx::Error> {
    if !claim_processing(pool, job.analysis_id).await? {
        // Already claimed or deleted; nothing to do.
        info!("Analysis {} not claimable, skipping", job.analysis_id);
        return Ok(());
    }

    // Step 1: resume (resume-only and both-documents flows)
    let resume_analysis = match &job.resume_text {
        Some(text) => {
            info!("Analyzing resume for analysis {}", job.analysis_id);
            let value = analyze_resume(llm, text).await;
            store_resume_analysis(pool, job.analysis_id, &value).await?;
            Some(value)
        }
        None => None,
    };

    // Step 2: job description
    let job_analysis = match &job.job_text {
        Some(text) => {
            info!("Analyzing job description for analysis {}", job.analysis_id);
            let value = analyze_job_description(llm, text).await;
            store_job_analysis(pool, job.analysis_id, &value).await?;
            Some(value)
        }
        None => None,
    };

    // Step 3: connections need both sides
    let connections = match (&resume_analysis, &job_analysis) {
        (Some(resume), Some(jd)) => {
            info!("Finding connections for analysis {}", job.analysis_id);
            let value = find_connections(llm, resume, jd).await;
            store_connections(pool, job.analysis_id, &value).await?;
            Some(value)
        }
        _ => None,
    };

    // Step 4: narrative summary over whatever exists
    info!("Generating context summary for analysis {}", job.analysis_id);
    let summary = generate_context_summary(
        llm,
        resume_analysis.as_ref().unwrap_or(&Value::Null),
        job_analysis.as_ref().unwrap_or(&Value::Null),
        connections.as_ref().unwrap_or(&Value::Null),
    )
    .await;
    complete(pool, job.analysis_id, &summary).await?;

    record_context_stage(pool, &job).await?;

    info!("Analysis {} completed successfully", job.analysis_id);
    Ok(())
}

/// Claims the analysis for processing. Returns false when the row is gone
/// or has already left `pending` — the guard that keeps status monotonic.
async fn claim_processing(pool: &PgPool, analysis_id: Uuid) -> Result<bool, sqlx::Error> {
    let (step, message) = PROGRESS_QUEUED;
    let result = sqlx::query(
        r#"
        UPDATE document_analyses
        SET status = $2, progress_step = $3, progress_message = $4, updated_at = now()
        WHERE id = $1 AND status = $5
        "#,
    )
    .bind(analysis_id)
    .bind(AnalysisStatus::Processing.as_str())
    .bind(step)
    .bind(message)
    .bind(AnalysisStatus::Pending.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

async fn store_resume_analysis(
    pool: &PgPool,
    analysis_id: Uuid,
    value: &Value,
) -> Result<(), sqlx::Error> {
    let (step, message) = PROGRESS_RESUME;
    sqlx::query(
        r#"
        UPDATE document_analyses
        SET resume_analysis = $2, progress_step = $3, progress_message = $4, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(analysis_id)
    .bind(value)
    .bind(step)
    .bind(message)
    .execute(pool)
    .await?;
    Ok(())
}

async fn store_job_analysis(
    pool: &PgPool,
    analysis_id: Uuid,
    value: &Value,
) -> Result<(), sqlx::Error> {
    let (step, message) = PROGRESS_JOB;
    sqlx::query(
        r#"
        UPDATE document_analyses
        SET job_analysis = $2, progress_step = $3, progress_message = $4, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(analysis_id)
    .bind(value)
    .bind(step)
    .bind(message)
    .execute(pool)
    .await?;
    Ok(())
}

async fn store_connections(
    pool: &PgPool,
    analysis_id: Uuid,
    value: &Value,
) -> Result<(), sqlx::Error> {
    let derived = derive_text_fields(value);
    let (step, message) = PROGRESS_CONNECTIONS;
    sqlx::query(
        r#"
        UPDATE document_analyses
        SET connections_analysis = $2, strengths = $3, gaps = $4,
            role_fit_narrative = $5, progress_step = $6, progress_message = $7,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(analysis_id)
    .bind(value)
    .bind(derived.strengths)
    .bind(derived.gaps)
    .bind(derived.role_fit_narrative)
    .bind(step)
    .bind(message)
    .execute(pool)
    .await?;
    Ok(())
}

async fn complete(pool: &PgPool, analysis_id: Uuid, summary: &str) -> Result<(), sqlx::Error> {
    let (step, message) = PROGRESS_DONE;
    sqlx::query(
        r#"
        UPDATE document_analyses
        SET context_summary = $2, status = $3, completed_at = now(),
            progress_step = $4, progress_message = $5, updated_at = now()
        WHERE id = $1 AND status = $6
        "#,
    )
    .bind(analysis_id)
    .bind(summary)
    .bind(AnalysisStatus::Completed.as_str())
    .bind(step)
    .bind(message)
    .bind(AnalysisStatus::Processing.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Completing the pipeline completes the IPP Context stage; later stages
/// are written by their own endpoints as the product grows.
async fn record_context_stage(pool: &PgPool, job: &AnalysisJob) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ipp_stage_progress
            (id, user_id, analysis_id, context_completed, context_completed_at)
        VALUES ($1, $2, $3, TRUE, now())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.user_id)
    .bind(job.analysis_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Terminal failure path. Never downgrades a completed analysis.
async fn mark_failed(pool: &PgPool, analysis_id: Uuid, reason: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE document_analyses
        SET status = $2, error_message = $3, updated_at = now()
        WHERE id = $1 AND status <> $4
        "#,
    )
    .bind(analysis_id)
    .bind(AnalysisStatus::Failed.as_str())
    .bind(reason)
    .bind(AnalysisStatus::Completed.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_steps_are_ordered() {
        let steps = [
            PROGRESS_QUEUED,
            PROGRESS_RESUME,
            PROGRESS_JOB,
            PROGRESS_CONNECTIONS,
            PROGRESS_DONE,
        ];
        for pair in steps.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        assert_eq!(PROGRESS_DONE.0, 4);
    }

    #[test]
    fn test_progress_messages_are_human_readable() {
        assert_eq!(PROGRESS_DONE.1, "Analysis complete");
        assert_eq!(PROGRESS_RESUME.1, "Resume analyzed");
    }
}
