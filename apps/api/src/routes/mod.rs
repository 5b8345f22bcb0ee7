pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, set_header::SetResponseHeaderLayer};

use crate::email::handlers as email;
use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;


/// Plain `{message}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route("/api/resume", post(resume::handle_submit_resume))
        .route("/api/resumes", get(resume::handle_search_resumes))
        .route("/api/resumes/count", get(resume::handle_count_resumes))
        .route(
            "/api/resumes/:id",
            axum::routing::delete(resume::handle_delete_resume),
        )
        .route("/api/upload", post(resume::handle_upload))
        // Jobs
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/apply", post(jobs::handle_apply))
        .route(
            "/api/generate-description",
            post(jobs::handle_generate_description),
        )
        .route("/api/match-resumes", post(jobs::handle_match_resumes))
        // Email
        .route("/api/send-email", post(email::handle_send_email))
        .route("/api/email", post(email::handle_request_otp))
        .route("/api/verify-otp", post(email::handle_verify_otp))
        .route("/api/email-count", get(email::handle_email_count))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        // Security headers; handlers may set their own values first.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .with_state(state)
}
