//! Axum route handlers for job postings, applications and job-side tooling.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::inference::prompts::job_description_prompt;
use crate::matching::match_resumes;
use crate::models::job::{JobPosting, UpdateOutcome};
use crate::models::parse_record_id;
use crate::models::resume::ResumeRecord;
use crate::routes::MessageResponse;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub message: String,
    pub job: JobPosting,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub user_id: String,
    pub job_id: String,
}

/// Skills arrive either as a list or as one pre-formatted string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl SkillsInput {
    pub fn joined(&self) -> String {
        match self {
            SkillsInput::List(items) => items.join(", "),
            SkillsInput::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionRequest {
    pub job_title: String,
    pub skills: SkillsInput,
}

#[derive(Debug, Serialize)]
pub struct GenerateDescriptionResponse {
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResumesRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResumesResponse {
    pub resumes: Vec<ResumeRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(doc): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    let job = state.store.insert_job(doc).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            message: "Job posted successfully!".to_string(),
            job,
        }),
    ))
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<JobPosting>, AppError> {
    let id = parse_record_id(&raw_id, "job")?;
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

/// PUT /api/jobs/:id
///
/// Merge update: top-level keys in the body overwrite the stored ones, all
/// other fields are kept.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<UpdateOutcome>, AppError> {
    let id = parse_record_id(&raw_id, "job")?;
    let Value::Object(patch) = body else {
        return Err(AppError::Validation(
            "Job update must be a JSON object".to_string(),
        ));
    };

    let outcome = state
        .store
        .update_job(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(outcome))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_record_id(&raw_id, "job")?;
    if !state.store.delete_job(id).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// POST /api/apply
///
/// The job must exist at apply time. Repeated applications are recorded as-is.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let job_id = parse_record_id(&request.job_id, "job")?;
    if state.store.get_job(job_id).await?.is_none() {
        return Err(AppError::NotFound(
            "Job not found. Unable to apply.".to_string(),
        ));
    }

    let application = state
        .store
        .insert_application(&request.user_id, job_id)
        .await?;
    info!(
        "Application {} by user {} for job {job_id}",
        application.id, application.user_id
    );
    Ok(Json(MessageResponse::new(
        "Application submitted successfully.",
    )))
}

/// POST /api/generate-description
pub async fn handle_generate_description(
    State(state): State<AppState>,
    Json(request): Json<GenerateDescriptionRequest>,
) -> Result<Json<GenerateDescriptionResponse>, AppError> {
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("jobTitle cannot be empty".to_string()));
    }

    let prompt = job_description_prompt(&request.job_title, &request.skills.joined());
    let description = state.generator.generate(&prompt).await?;
    Ok(Json(GenerateDescriptionResponse { description }))
}

/// POST /api/match-resumes
pub async fn handle_match_resumes(
    State(state): State<AppState>,
    Json(request): Json<MatchResumesRequest>,
) -> Result<Json<MatchResumesResponse>, AppError> {
    let resumes = state.store.search_resumes("").await?;
    Ok(Json(MatchResumesResponse {
        resumes: match_resumes(resumes, &request.job_description),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_input_list_is_joined() {
        let skills: SkillsInput = serde_json::from_str(r#"["Rust", "SQL"]"#).unwrap();
        assert_eq!(skills.joined(), "Rust, SQL");
    }

    #[test]
    fn test_skills_input_text_is_kept() {
        let skills: SkillsInput = serde_json::from_str(r#""Rust and SQL""#).unwrap();
        assert_eq!(skills.joined(), "Rust and SQL");
    }
}
