//! Blob storage for uploaded files: local disk by default, S3/MinIO when configured.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Unknown blob location: {0}")]
    UnknownLocation(String),
}

/// Durable storage for upload bytes. `put` returns the locator recorded as the
/// file's `path`; `remove` accepts that same locator.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str)
        -> Result<String, StorageError>;

    async fn remove(&self, locator: &str) -> Result<(), StorageError>;
}

/// Builds the stored file name: upload time in unix millis, a random suffix, and the
/// original extension.
pub fn upload_key(original_name: &str, now_millis: i64) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{now_millis}-{}.{ext}", &suffix[..8]),
        _ => format!("{now_millis}-{}", &suffix[..8]),
    }
}

pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Ensures the upload directory exists.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!("Local blob store at {}", root.display());
        Ok(Self { root })
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.root.join(key);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, locator: &str) -> Result<(), StorageError> {
        let path = Path::new(locator);
        if !path.starts_with(&self.root) {
            return Err(StorageError::UnknownLocation(locator.to_string()));
        }
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn key_from_locator<'a>(&self, locator: &'a str) -> Option<&'a str> {
        locator
            .strip_prefix("s3://")
            .and_then(|rest| rest.strip_prefix(self.bucket.as_str()))
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = format!("uploads/{key}");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("upload failed: {e}")))?;

        info!("Uploaded file to s3://{}/{}", self.bucket, key);
        Ok(format!("s3://{}/{}", self.bucket, key))
    }

    async fn remove(&self, locator: &str) -> Result<(), StorageError> {
        let key = self
            .key_from_locator(locator)
            .ok_or_else(|| StorageError::UnknownLocation(locator.to_string()))?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("delete failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_key_keeps_extension() {
        let key = upload_key("resume.final.pdf", 1_700_000_000_000);
        assert!(key.starts_with("1700000000000-"));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn test_upload_key_without_extension() {
        let key = upload_key("resume", 42);
        assert!(key.starts_with("42-"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_upload_keys_are_unique_within_a_millisecond() {
        assert_ne!(upload_key("a.pdf", 1), upload_key("a.pdf", 1));
    }

    #[tokio::test]
    async fn test_local_store_put_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("uploads")).await.unwrap();

        let locator = store
            .put("1-abc.pdf", Bytes::from_static(b"%PDF"), "application/pdf")
            .await
            .unwrap();
        assert_eq!(tokio::fs::read(&locator).await.unwrap(), b"%PDF");

        store.remove(&locator).await.unwrap();
        assert!(!Path::new(&locator).exists());
    }

    #[tokio::test]
    async fn test_local_store_refuses_foreign_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        let err = store.remove("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::UnknownLocation(_)));
    }
}
