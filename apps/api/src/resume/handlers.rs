//! Axum route handlers for resumes.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::recommend_jobs;
use crate::models::parse_record_id;
use crate::models::resume::{FileMetadata, ResumeFields, ResumeRecord};
use crate::resume::upload::{ingest_upload, UploadedFile};
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub skills: Vec<String>,
    pub recommended_jobs: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResumeResponse {
    pub message: String,
    pub analysis_result: AnalysisResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_data: FileMetadata,
    pub resume_data: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub success: bool,
    pub count: i64,
}

/// POST /api/resume
///
/// Stores a resume submitted as JSON and recommends posted jobs sharing one of its skills.
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    Json(fields): Json<ResumeFields>,
) -> Result<Json<SubmitResumeResponse>, AppError> {
    let record = state.store.insert_resume(fields.without_identity()).await?;

    let jobs = state.store.list_jobs().await?;
    let recommended_jobs = recommend_jobs(&record.fields.skills, &jobs);

    Ok(Json(SubmitResumeResponse {
        message: "Resume saved successfully!".to_string(),
        analysis_result: AnalysisResult {
            skills: record.fields.skills,
            recommended_jobs,
        },
    }))
}

/// GET /api/resumes?search=term
pub async fn handle_search_resumes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let resumes = state.store.search_resumes(&query.search).await?;
    Ok(Json(resumes))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("Deleting resume with ID: {raw_id}");
    let id = parse_record_id(&raw_id, "resume")?;

    if !state.store.delete_resume(id).await? {
        return Err(AppError::NotFound("Resume not found".to_string()));
    }
    Ok(Json(MessageResponse::new("Resume deleted successfully")))
}

/// GET /api/resumes/count
pub async fn handle_count_resumes(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.store.count_resumes().await?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

/// POST /api/upload
///
/// Multipart upload with the file in the `resume` field. Other fields are ignored.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("resume").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
        upload = Some(UploadedFile {
            original_name,
            mime_type,
            bytes,
        });
        break;
    }

    let file = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let outcome = ingest_upload(&state, file).await?;

    Ok(Json(UploadResponse {
        message: "File uploaded and saved successfully!".to_string(),
        file_data: outcome.file_data,
        resume_data: outcome.resume_data,
    }))
}
