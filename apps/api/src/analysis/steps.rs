//! Individual LLM steps of the analysis pipeline.
//!
//! Each step degrades instead of failing: an LLM error or unparseable
//! response produces a structured `{"error", "details"}` value (or a
//! fallback sentence for the narrative step) so later steps and the client
//! still see partial results. Failures are logged here.

use serde_json::{json, Value};
use tracing::warn;

use crate::analysis::prompts::{
    CONNECTIONS_TEMPLATE, CONTEXT_SUMMARY_TEMPLATE, JOB_ANALYSIS_TEMPLATE,
    RESUME_ANALYSIS_TEMPLATE, SUMMARY_FALLBACK,
};
use crate::llm_client::prompts::{COUNSELOR_SYSTEM, JSON_ONLY_INSTRUCTION};
use crate::llm_client::LlmClient;

fn json_system() -> String {
    format!("{COUNSELOR_SYSTEM} {JSON_ONLY_INSTRUCTION}")
}

fn degraded(step: &str, details: impl std::fmt::Display) -> Value {
    warn!("Error in {step}: {details}");
    json!({
        "error": format!("Failed to {step}"),
        "details": details.to_string(),
    })
}

/// Step 1: extract structured information from the resume.
pub async fn analyze_resume(llm: &LlmClient, resume_text: &str) -> Value {
    let prompt = RESUME_ANALYSIS_TEMPLATE.replace("{resume_text}", resume_text);
    match llm.call_json::<Value>(&prompt, &json_system()).await {
        Ok(value) => value,
        Err(e) => degraded("analyze resume", e),
    }
}

/// Step 2: extract structured requirements from the job description.
pub async fn analyze_job_description(llm: &LlmClient, job_text: &str) -> Value {
    let prompt = JOB_ANALYSIS_TEMPLATE.replace("{job_text}", job_text);
    match llm.call_json::<Value>(&prompt, &json_system()).await {
        Ok(value) => value,
        Err(e) => degraded("analyze job description", e),
    }
}

/// Step 3: connect candidate background to role requirements.
pub async fn find_connections(llm: &LlmClient, resume_analysis: &Value, job_analysis: &Value) -> Value {
    let prompt = CONNECTIONS_TEMPLATE
        .replace("{resume_analysis}", &resume_analysis.to_string())
        .replace("{job_analysis}", &job_analysis.to_string());
    match llm.call_json::<Value>(&prompt, &json_system()).await {
        Ok(value) => value,
        Err(e) => degraded("analyze connections", e),
    }
}

/// Step 4: narrative summary for the Context stage. Plain prose, not JSON.
pub async fn generate_context_summary(
    llm: &LlmClient,
    resume_analysis: &Value,
    job_analysis: &Value,
    connections: &Value,
) -> String {
    let prompt = CONTEXT_SUMMARY_TEMPLATE
        .replace("{resume_analysis}", &resume_analysis.to_string())
        .replace("{job_analysis}", &job_analysis.to_string())
        .replace("{connections}", &connections.to_string());
    match llm.call(&prompt, COUNSELOR_SYSTEM).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Error generating context summary: {e}");
            SUMMARY_FALLBACK.to_string()
        }
    }
}

/// Derived text fields pulled out of the connections JSON for quick display.
#[derive(Debug, Default, PartialEq)]
pub struct DerivedFields {
    pub strengths: Option<String>,
    pub gaps: Option<String>,
    pub role_fit_narrative: Option<String>,
}

/// Flattens connection sections into the analysis row's text columns:
/// `strengths` ← unique_strengths, `gaps` ← development_areas,
/// `role_fit_narrative` ← value_alignment (falling back to the fit score).
pub fn derive_text_fields(connections: &Value) -> DerivedFields {
    let role_fit_narrative = join_section(connections.get("value_alignment")).or_else(|| {
        connections
            .get("overall_fit_score")
            .and_then(Value::as_f64)
            .map(|score| format!("Overall role fit score: {score}/10"))
    });

    DerivedFields {
        strengths: join_section(connections.get("unique_strengths")),
        gaps: join_section(connections.get("development_areas")),
        role_fit_narrative,
    }
}

/// Renders a connections section as newline-joined text. Sections come back
/// from the LLM as a string, a string array, or an array of objects with a
/// text-ish field; anything else yields None.
fn join_section(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let lines: Vec<&str> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(map) => map
                        .get("text")
                        .or_else(|| map.get("description"))
                        .or_else(|| map.get("summary"))
                        .and_then(Value::as_str),
                    _ => None,
                })
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_section_string() {
        let v = json!({"s": "strong alignment with mission"});
        assert_eq!(
            join_section(v.get("s")),
            Some("strong alignment with mission".to_string())
        );
    }

    #[test]
    fn test_join_section_string_array() {
        let v = json!({"s": ["Rust expertise", "Mentoring record"]});
        assert_eq!(
            join_section(v.get("s")),
            Some("Rust expertise\nMentoring record".to_string())
        );
    }

    #[test]
    fn test_join_section_object_array() {
        let v = json!({"s": [{"text": "Systems depth"}, {"description": "Team lead"}]});
        assert_eq!(
            join_section(v.get("s")),
            Some("Systems depth\nTeam lead".to_string())
        );
    }

    #[test]
    fn test_join_section_missing_or_odd_shapes() {
        let v = json!({"s": 42});
        assert_eq!(join_section(v.get("s")), None);
        assert_eq!(join_section(v.get("missing")), None);
        assert_eq!(join_section(Some(&json!([]))), None);
    }

    #[test]
    fn test_derive_text_fields_full() {
        let connections = json!({
            "unique_strengths": ["Distributed systems", "Teaching"],
            "development_areas": ["Kubernetes"],
            "value_alignment": "Service-oriented background matches the mission.",
            "overall_fit_score": 8
        });
        let derived = derive_text_fields(&connections);
        assert_eq!(
            derived.strengths.as_deref(),
            Some("Distributed systems\nTeaching")
        );
        assert_eq!(derived.gaps.as_deref(), Some("Kubernetes"));
        assert_eq!(
            derived.role_fit_narrative.as_deref(),
            Some("Service-oriented background matches the mission.")
        );
    }

    #[test]
    fn test_derive_text_fields_falls_back_to_score() {
        let connections = json!({"overall_fit_score": 7});
        let derived = derive_text_fields(&connections);
        assert_eq!(
            derived.role_fit_narrative.as_deref(),
            Some("Overall role fit score: 7/10")
        );
        assert!(derived.strengths.is_none());
    }

    #[test]
    fn test_derive_text_fields_degraded_connections() {
        // Step-3 degradation stores an error object; nothing derivable.
        let connections = json!({"error": "Failed to analyze connections", "details": "timeout"});
        assert_eq!(derive_text_fields(&connections), DerivedFields::default());
    }
}
