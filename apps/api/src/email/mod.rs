pub mod handlers;
pub mod otp;
