pub mod email;
pub mod job;
pub mod resume;

use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path or body identifier, rejecting malformed values before any store call.
pub fn parse_record_id(raw: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid {kind} ID format")))
}
