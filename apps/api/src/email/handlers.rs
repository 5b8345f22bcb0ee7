//! Axum route handlers for OTP verification and the generic mail relay.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::email::otp::{generate_otp, otp_matches, otp_message, OTP_SUBJECT};
use crate::errors::AppError;
use crate::mailer::OutgoingMail;
use crate::resume::handlers::CountResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub message: String,
    pub info: String,
}

/// POST /api/email
///
/// Generates a new OTP, stores it (overwriting any previous code for the
/// address) and mails it.
pub async fn handle_request_otp(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<OtpResponse>, AppError> {
    let otp = generate_otp();
    state.store.upsert_otp(&request.email, &otp).await?;
    info!("Stored OTP for {}", request.email);

    state
        .mailer
        .send(OutgoingMail {
            to: request.email.clone(),
            subject: OTP_SUBJECT.to_string(),
            body: otp_message(&otp),
        })
        .await?;
    info!("OTP sent to {}", request.email);

    Ok(Json(OtpResponse {
        success: true,
        message: "OTP sent to your email for verification".to_string(),
    }))
}

/// POST /api/verify-otp
pub async fn handle_verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<OtpResponse>, AppError> {
    info!("Verifying OTP for {}", request.email);
    let record = state
        .store
        .find_otp(&request.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found".to_string()))?;

    if !otp_matches(&record.otp, &request.otp) {
        return Err(AppError::Validation("Invalid OTP".to_string()));
    }
    Ok(Json(OtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}

/// GET /api/email-count
pub async fn handle_email_count(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.store.count_emails().await?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

/// POST /api/send-email
pub async fn handle_send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let info = state
        .mailer
        .send(OutgoingMail {
            to: request.to,
            subject: request.subject,
            body: request.body,
        })
        .await?;

    Ok(Json(SendEmailResponse {
        message: "Email sent successfully".to_string(),
        info,
    }))
}
