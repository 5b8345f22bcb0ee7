use rand::Rng;

pub const OTP_LENGTH: usize = 6;
pub const OTP_SUBJECT: &str = "OTP for Email Verification";

/// A fresh numeric code of `OTP_LENGTH` digits. Leading zeros are kept.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn otp_message(otp: &str) -> String {
    format!("Your OTP for email verification is: {otp}")
}

/// Exact string comparison against the stored code.
pub fn otp_matches(stored: &str, submitted: &str) -> bool {
    stored == submitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), OTP_LENGTH);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_otp_message_contains_code() {
        assert_eq!(
            otp_message("012345"),
            "Your OTP for email verification is: 012345"
        );
    }

    #[test]
    fn test_otp_matches_is_exact() {
        assert!(otp_matches("012345", "012345"));
        assert!(!otp_matches("012345", "12345"));
        assert!(!otp_matches("012345", " 012345"));
    }
}
