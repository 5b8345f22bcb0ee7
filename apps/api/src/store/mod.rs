//! Record store: persistence for resumes, file metadata, jobs, applications and OTPs.
//!
//! `AppState` holds an `Arc<dyn RecordStore>`; production uses `PgRecordStore`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::email::EmailOtpRecord;
use crate::models::job::{Application, JobPosting, UpdateOutcome};
use crate::models::resume::{FileMetadata, ResumeFields, ResumeRecord};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_resume(&self, fields: ResumeFields) -> sqlx::Result<ResumeRecord>;

    /// Writes the file metadata and the resume referencing it atomically.
    /// `fields.file_id` is overwritten with `metadata.id`.
    async fn insert_upload(
        &self,
        metadata: &FileMetadata,
        fields: ResumeFields,
    ) -> sqlx::Result<ResumeRecord>;

    /// Case-insensitive substring search over name and skills; empty term returns all.
    async fn search_resumes(&self, term: &str) -> sqlx::Result<Vec<ResumeRecord>>;

    /// Returns `false` when no record had the id.
    async fn delete_resume(&self, id: Uuid) -> sqlx::Result<bool>;

    async fn count_resumes(&self) -> sqlx::Result<i64>;

    async fn insert_job(&self, doc: Map<String, Value>) -> sqlx::Result<JobPosting>;

    async fn list_jobs(&self) -> sqlx::Result<Vec<JobPosting>>;

    async fn get_job(&self, id: Uuid) -> sqlx::Result<Option<JobPosting>>;

    /// Merge update (`$set` overlay). `None` when the job does not exist.
    async fn update_job(
        &self,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> sqlx::Result<Option<UpdateOutcome>>;

    async fn delete_job(&self, id: Uuid) -> sqlx::Result<bool>;

    async fn insert_application(&self, user_id: &str, job_id: Uuid) -> sqlx::Result<Application>;

    /// Inserts the email or overwrites its OTP.
    async fn upsert_otp(&self, email: &str, otp: &str) -> sqlx::Result<()>;

    async fn find_otp(&self, email: &str) -> sqlx::Result<Option<EmailOtpRecord>>;

    async fn count_emails(&self) -> sqlx::Result<i64>;
}
