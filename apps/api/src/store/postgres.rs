use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::models::email::EmailOtpRecord;
use crate::models::job::{apply_set, Application, JobPosting, UpdateOutcome};
use crate::models::resume::{FileMetadata, ResumeFields, ResumeRecord};
use crate::store::RecordStore;

#[derive(FromRow)]
struct ResumeRow {
    id: Uuid,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    skills: Vec<String>,
    file_id: Option<Uuid>,
    extra: Json<Map<String, Value>>,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        ResumeRecord {
            id: row.id,
            fields: ResumeFields {
                name: row.name,
                email: row.email,
                phone: row.phone,
                skills: row.skills,
                file_id: row.file_id,
                extra: row.extra.0,
            },
        }
    }
}

#[derive(FromRow)]
struct JobRow {
    id: Uuid,
    doc: Json<Map<String, Value>>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        JobPosting {
            id: row.id,
            doc: row.doc.0,
        }
    }
}

const RESUME_COLUMNS: &str = "id, name, email, phone, skills, file_id, extra";

/// Wraps a search term as an ILIKE pattern, escaping the LIKE wildcards so the
/// term matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn insert_resume_row<'e, E>(executor: E, id: Uuid, fields: &ResumeFields) -> sqlx::Result<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO resumes (id, name, email, phone, skills, file_id, extra)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(&fields.name)
    .bind(&fields.email)
    .bind(&fields.phone)
    .bind(&fields.skills)
    .bind(fields.file_id)
    .bind(Json(&fields.extra))
    .execute(executor)
    .await?;
    Ok(())
}

/// PostgreSQL-backed record store. Free-form documents (job postings, extra
/// resume keys) live in JSONB columns.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_resume(&self, fields: ResumeFields) -> sqlx::Result<ResumeRecord> {
        let id = Uuid::new_v4();
        insert_resume_row(&self.pool, id, &fields).await?;
        info!("Inserted resume {id}");
        Ok(ResumeRecord { id, fields })
    }

    async fn insert_upload(
        &self,
        metadata: &FileMetadata,
        mut fields: ResumeFields,
    ) -> sqlx::Result<ResumeRecord> {
        fields.file_id = Some(metadata.id);
        let id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO file_metadata (id, original_name, mime_type, path, size, upload_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(metadata.id)
        .bind(&metadata.original_name)
        .bind(&metadata.mime_type)
        .bind(&metadata.path)
        .bind(metadata.size)
        .bind(metadata.upload_date)
        .execute(&mut *tx)
        .await?;
        insert_resume_row(&mut *tx, id, &fields).await?;
        tx.commit().await?;

        info!("Inserted resume {id} for file {}", metadata.id);
        Ok(ResumeRecord { id, fields })
    }

    async fn search_resumes(&self, term: &str) -> sqlx::Result<Vec<ResumeRecord>> {
        let sql = format!(
            r#"
            SELECT {RESUME_COLUMNS}
            FROM resumes
            WHERE $1 = ''
               OR name ILIKE $2
               OR EXISTS (SELECT 1 FROM unnest(skills) AS skill WHERE skill ILIKE $2)
            ORDER BY created_at, id
            "#
        );
        let rows = sqlx::query_as::<_, ResumeRow>(&sql)
            .bind(term)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ResumeRecord::from).collect())
    }

    async fn delete_resume(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_resumes(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
            .fetch_one(&self.pool)
            .await
    }

    async fn insert_job(&self, mut doc: Map<String, Value>) -> sqlx::Result<JobPosting> {
        doc.remove("_id");
        doc.remove("id");
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO jobs (id, doc) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await?;
        info!("Inserted job {id}");
        Ok(JobPosting { id, doc })
    }

    async fn list_jobs(&self) -> sqlx::Result<Vec<JobPosting>> {
        let rows = sqlx::query_as::<_, JobRow>("SELECT id, doc FROM jobs ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn get_job(&self, id: Uuid) -> sqlx::Result<Option<JobPosting>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT id, doc FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn update_job(
        &self,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> sqlx::Result<Option<UpdateOutcome>> {
        let mut tx = self.pool.begin().await?;

        let current: Option<Json<Map<String, Value>>> =
            sqlx::query_scalar("SELECT doc FROM jobs WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(Json(mut doc)) = current else {
            return Ok(None);
        };

        let modified = apply_set(&mut doc, patch);
        if modified {
            sqlx::query("UPDATE jobs SET doc = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(&doc))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(Some(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        }))
    }

    async fn delete_job(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_application(&self, user_id: &str, job_id: Uuid) -> sqlx::Result<Application> {
        let application = Application {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            job_id,
            applied_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO applications (id, user_id, job_id, applied_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(application.id)
        .bind(&application.user_id)
        .bind(application.job_id)
        .bind(application.applied_at)
        .execute(&self.pool)
        .await?;
        Ok(application)
    }

    async fn upsert_otp(&self, email: &str, otp: &str) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO emails (email, otp) VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET otp = EXCLUDED.otp, updated_at = now()
            "#,
        )
        .bind(email)
        .bind(otp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_otp(&self, email: &str) -> sqlx::Result<Option<EmailOtpRecord>> {
        sqlx::query_as::<_, EmailOtpRecord>("SELECT email, otp FROM emails WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn count_emails(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM emails")
            .fetch_one(&self.pool)
            .await
    }
}
