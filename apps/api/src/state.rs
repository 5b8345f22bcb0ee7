use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::inference::DescriptionGenerator;
use crate::mailer::Mailer;
use crate::storage::BlobStore;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub mailer: Arc<dyn Mailer>,
    pub generator: Arc<dyn DescriptionGenerator>,
    pub config: Config,
}
