use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{FileMetadata, ResumeRecord};
use crate::resume::parser::parse_resume_text;
use crate::state::AppState;
use crate::storage::upload_key;

/// One file received from the multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub file_data: FileMetadata,
    pub resume_data: ResumeRecord,
}

/// Upload pipeline: store bytes → extract text → parse fields → persist
/// metadata and resume in one transaction.
///
/// Nothing is written to the record store until extraction has succeeded. If
/// extraction or the insert fails, the stored blob is removed again; a failed
/// removal is logged and the original error is returned.
pub async fn ingest_upload(state: &AppState, file: UploadedFile) -> Result<UploadOutcome, AppError> {
    let now = Utc::now();
    let key = upload_key(&file.original_name, now.timestamp_millis());
    let size = file.bytes.len() as i64;

    let path = state
        .blobs
        .put(&key, file.bytes.clone(), &file.mime_type)
        .await?;
    info!("Stored upload '{}' at {path} ({size} bytes)", file.original_name);

    let metadata = FileMetadata {
        id: Uuid::new_v4(),
        original_name: file.original_name,
        mime_type: file.mime_type,
        path,
        size,
        upload_date: now,
    };

    match extract_and_persist(state, &metadata, file.bytes).await {
        Ok(resume) => Ok(UploadOutcome {
            file_data: metadata,
            resume_data: resume,
        }),
        Err(e) => {
            if let Err(cleanup) = state.blobs.remove(&metadata.path).await {
                warn!("Failed to remove orphaned upload {}: {cleanup}", metadata.path);
            }
            Err(e)
        }
    }
}

async fn extract_and_persist(
    state: &AppState,
    metadata: &FileMetadata,
    bytes: Bytes,
) -> Result<ResumeRecord, AppError> {
    let text = state.extractor.extract(bytes).await?;
    let fields = parse_resume_text(&text);
    let resume = state.store.insert_upload(metadata, fields).await?;
    info!("Parsed resume {} from file {}", resume.id, metadata.id);
    Ok(resume)
}
