use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::email::EmailOtpRecord;
use crate::models::job::{apply_set, Application, JobPosting, UpdateOutcome};
use crate::models::resume::{FileMetadata, ResumeFields, ResumeRecord};
use crate::store::RecordStore;

#[derive(Default)]
struct Collections {
    resumes: Vec<ResumeRecord>,
    files: Vec<FileMetadata>,
    jobs: Vec<JobPosting>,
    applications: Vec<Application>,
    emails: BTreeMap<String, String>,
}

/// In-process store for handler tests. Counts every call so tests can assert
/// that validation short-circuits before the store is touched.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Collections>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn files(&self) -> Vec<FileMetadata> {
        self.data.lock().unwrap().files.clone()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.data.lock().unwrap().applications.clone()
    }

    fn touch(&self) -> std::sync::MutexGuard<'_, Collections> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.data.lock().unwrap()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_resume(&self, fields: ResumeFields) -> sqlx::Result<ResumeRecord> {
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            fields,
        };
        self.touch().resumes.push(record.clone());
        Ok(record)
    }

    async fn insert_upload(
        &self,
        metadata: &FileMetadata,
        mut fields: ResumeFields,
    ) -> sqlx::Result<ResumeRecord> {
        fields.file_id = Some(metadata.id);
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            fields,
        };
        let mut data = self.touch();
        data.files.push(metadata.clone());
        data.resumes.push(record.clone());
        Ok(record)
    }

    async fn search_resumes(&self, term: &str) -> sqlx::Result<Vec<ResumeRecord>> {
        Ok(self
            .touch()
            .resumes
            .iter()
            .filter(|r| r.fields.matches_search(term))
            .cloned()
            .collect())
    }

    async fn delete_resume(&self, id: Uuid) -> sqlx::Result<bool> {
        let mut data = self.touch();
        let before = data.resumes.len();
        data.resumes.retain(|r| r.id != id);
        Ok(data.resumes.len() < before)
    }

    async fn count_resumes(&self) -> sqlx::Result<i64> {
        Ok(self.touch().resumes.len() as i64)
    }

    async fn insert_job(&self, mut doc: Map<String, Value>) -> sqlx::Result<JobPosting> {
        doc.remove("_id");
        doc.remove("id");
        let job = JobPosting {
            id: Uuid::new_v4(),
            doc,
        };
        self.touch().jobs.push(job.clone());
        Ok(job)
    }

    async fn list_jobs(&self) -> sqlx::Result<Vec<JobPosting>> {
        Ok(self.touch().jobs.clone())
    }

    async fn get_job(&self, id: Uuid) -> sqlx::Result<Option<JobPosting>> {
        Ok(self.touch().jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn update_job(
        &self,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> sqlx::Result<Option<UpdateOutcome>> {
        let mut data = self.touch();
        let Some(job) = data.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        let modified = apply_set(&mut job.doc, patch);
        Ok(Some(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        }))
    }

    async fn delete_job(&self, id: Uuid) -> sqlx::Result<bool> {
        let mut data = self.touch();
        let before = data.jobs.len();
        data.jobs.retain(|j| j.id != id);
        Ok(data.jobs.len() < before)
    }

    async fn insert_application(&self, user_id: &str, job_id: Uuid) -> sqlx::Result<Application> {
        let application = Application {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            job_id,
            applied_at: Utc::now(),
        };
        self.touch().applications.push(application.clone());
        Ok(application)
    }

    async fn upsert_otp(&self, email: &str, otp: &str) -> sqlx::Result<()> {
        self.touch()
            .emails
            .insert(email.to_string(), otp.to_string());
        Ok(())
    }

    async fn find_otp(&self, email: &str) -> sqlx::Result<Option<EmailOtpRecord>> {
        Ok(self.touch().emails.get(email).map(|otp| EmailOtpRecord {
            email: email.to_string(),
            otp: otp.clone(),
        }))
    }

    async fn count_emails(&self) -> sqlx::Result<i64> {
        Ok(self.touch().emails.len() as i64)
    }
}
