//! In-process doubles for the external collaborators, shared by handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;

use crate::config::Config;
use crate::extract::{ExtractError, TextExtractor};
use crate::inference::{DescriptionGenerator, InferenceError};
use crate::mailer::{MailError, Mailer, OutgoingMail};
use crate::state::AppState;
use crate::storage::LocalBlobStore;
use crate::store::memory::MemoryStore;

/// Treats the upload as UTF-8 text, so tests can "upload" labeled lines directly.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<String, MailError> {
        if self.fail {
            return Err(MailError::Task("relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok("250 OK".to_string())
    }
}

/// Echoes the prompt back so tests can check what was sent to the model.
pub struct EchoGenerator;

#[async_trait]
impl DescriptionGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        Ok(format!("Generated: {prompt}"))
    }
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub upload_dir: TempDir,
}

pub async fn test_context() -> TestContext {
    test_context_with_mailer(RecordingMailer::default()).await
}

pub async fn test_context_with_mailer(mailer: RecordingMailer) -> TestContext {
    let upload_dir = tempfile::tempdir().expect("tempdir must be created");
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(mailer);
    let blobs = LocalBlobStore::new(upload_dir.path())
        .await
        .expect("upload dir must be writable");

    let state = AppState {
        store: store.clone(),
        blobs: Arc::new(blobs),
        extractor: Arc::new(PlainTextExtractor),
        mailer: mailer.clone(),
        generator: Arc::new(EchoGenerator),
        config: Config::for_tests(upload_dir.path().to_path_buf()),
    };

    TestContext {
        state,
        store,
        mailer,
        upload_dir,
    }
}
