use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One OTP per email address. Resubmitting an email overwrites its OTP; there is no expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EmailOtpRecord {
    pub email: String,
    pub otp: String,
}
