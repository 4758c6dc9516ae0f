pub mod otp_store;
pub mod user_account;
