use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::inference::DEFAULT_INFERENCE_URL;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// S3/MinIO settings. Present only when every S3 variable is set.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from: String,
    pub hugging_face_api_key: String,
    pub inference_api_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
    pub s3: Option<S3Config>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let smtp_username = require_env("SMTP_USERNAME")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            smtp_host: optional_env("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            smtp_password: require_env("SMTP_PASSWORD")?,
            email_from: optional_env("EMAIL_FROM").unwrap_or_else(|| smtp_username.clone()),
            smtp_username,
            hugging_face_api_key: require_env("HUGGING_FACE_API_KEY")?,
            inference_api_url: optional_env("INFERENCE_API_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            cors_origins: parse_origins(&optional_env("CORS_ORIGINS").unwrap_or_default()),
            s3: s3_from_env(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn s3_from_env() -> Option<S3Config> {
    Some(S3Config {
        bucket: optional_env("S3_BUCKET")?,
        endpoint: optional_env("S3_ENDPOINT")?,
        access_key_id: optional_env("AWS_ACCESS_KEY_ID")?,
        secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY")?,
    })
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            database_url: "postgres://localhost/hireboard_test".to_string(),
            smtp_host: "localhost".to_string(),
            smtp_username: "noreply@example.com".to_string(),
            smtp_password: "secret".to_string(),
            email_from: "noreply@example.com".to_string(),
            hugging_face_api_key: "hf_test".to_string(),
            inference_api_url: DEFAULT_INFERENCE_URL.to_string(),
            upload_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: Vec::new(),
            s3: None,
            port: 5001,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_blanks() {
        assert_eq!(
            parse_origins(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_parse_origins_empty() {
        assert!(parse_origins("").is_empty());
    }
}
