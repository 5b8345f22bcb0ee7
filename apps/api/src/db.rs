use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Tables backing each collection. Applied idempotently at startup; there is no
/// migration history.
const SCHEMA: &[(&str, &str)] = &[
    (
        "resumes",
        r#"
        CREATE TABLE IF NOT EXISTS resumes (
            id          UUID PRIMARY KEY,
            name        TEXT,
            email       TEXT,
            phone       TEXT,
            skills      TEXT[] NOT NULL DEFAULT '{}',
            file_id     UUID,
            extra       JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "file_metadata",
        r#"
        CREATE TABLE IF NOT EXISTS file_metadata (
            id             UUID PRIMARY KEY,
            original_name  TEXT NOT NULL,
            mime_type      TEXT NOT NULL,
            path           TEXT NOT NULL,
            size           BIGINT NOT NULL,
            upload_date    TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "jobs",
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id          UUID PRIMARY KEY,
            doc         JSONB NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "applications",
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            id          UUID PRIMARY KEY,
            user_id     TEXT NOT NULL,
            job_id      UUID NOT NULL,
            applied_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "emails",
        r#"
        CREATE TABLE IF NOT EXISTS emails (
            email       TEXT PRIMARY KEY,
            otp         TEXT NOT NULL,
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates any missing collection tables.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for (table, ddl) in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
        info!("Collection ready: {table}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_every_collection() {
        let tables: Vec<_> = SCHEMA.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            tables,
            vec!["resumes", "file_metadata", "jobs", "applications", "emails"]
        );
    }

    #[test]
    fn test_schema_is_idempotent() {
        assert!(SCHEMA
            .iter()
            .all(|(_, ddl)| ddl.contains("CREATE TABLE IF NOT EXISTS")));
    }
}
