use std::collections::HashMap;
use std::sync::Arc;
use time::{Duration, PrimitiveDateTime};
use tokio::sync::Mutex;

pub fn generate_otp_code() -> String {
    use rand::Rng;
    format!("{:06}", rand::rng().random_range(0u32..1_000_000))
}

#[derive(Debug, Clone)]
struct StoredOtp {
    code: String,
    issued_at: PrimitiveDateTime,
    expires_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOtp {
    Issued,
    RateLimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOtp {
    Valid,
    Expired,
    Mismatch,
    NotFound,
}

/// Single-process OTP map keyed by lowercased email. Codes are consumed on
/// successful verification and dropped once expired. A shared cache would
/// replace this struct wholesale; the rest of the login flow only sees the
/// `issue`/`verify` seam.
#[derive(Debug, Clone, Default)]
pub struct OtpStore {
    inner: Arc<Mutex<HashMap<String, StoredOtp>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh code unless one was issued within `resend_interval`.
    pub async fn issue(
        &self,
        email: &str,
        code: String,
        now: PrimitiveDateTime,
        expire_after: Duration,
        resend_interval: Duration,
    ) -> IssueOtp {
        let key = email.to_lowercase();
        let mut map = self.inner.lock().await;
        if let Some(existing) = map.get(&key) {
            if existing.issued_at + resend_interval > now && existing.expires_at > now {
                return IssueOtp::RateLimited;
            }
        }
        map.insert(
            key,
            StoredOtp {
                code,
                issued_at: now,
                expires_at: now + expire_after,
            },
        );
        IssueOtp::Issued
    }

    /// Check and consume. Expired entries are removed even on a failed check
    /// so the map does not accumulate dead codes.
    pub async fn verify(&self, email: &str, code: &str, now: PrimitiveDateTime) -> CheckOtp {
        let key = email.to_lowercase();
        let mut map = self.inner.lock().await;
        let Some(stored) = map.get(&key) else {
            return CheckOtp::NotFound;
        };
        if now > stored.expires_at {
            map.remove(&key);
            return CheckOtp::Expired;
        }
        if stored.code != code {
            return CheckOtp::Mismatch;
        }
        map.remove(&key);
        CheckOtp::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minute: u8) -> PrimitiveDateTime {
        PrimitiveDateTime::new(
            time::macros::date!(2026 - 01 - 15),
            time::Time::from_hms(12, minute, 0).unwrap(),
        )
    }

    const EXPIRE: Duration = Duration::minutes(5);
    const RESEND: Duration = Duration::minutes(1);

    #[tokio::test]
    async fn verify_consumes_the_code() {
        let store = OtpStore::new();
        store
            .issue("a@example.com", "123456".into(), at(0), EXPIRE, RESEND)
            .await;
        assert_eq!(
            store.verify("a@example.com", "123456", at(1)).await,
            CheckOtp::Valid
        );
        assert_eq!(
            store.verify("a@example.com", "123456", at(1)).await,
            CheckOtp::NotFound
        );
    }

    #[tokio::test]
    async fn correct_code_fails_after_expiry() {
        let store = OtpStore::new();
        store
            .issue("a@example.com", "123456".into(), at(0), EXPIRE, RESEND)
            .await;
        assert_eq!(
            store.verify("a@example.com", "123456", at(6)).await,
            CheckOtp::Expired
        );
        // the expired entry is gone entirely now
        assert_eq!(
            store.verify("a@example.com", "123456", at(6)).await,
            CheckOtp::NotFound
        );
    }

    #[tokio::test]
    async fn wrong_code_is_not_consumed() {
        let store = OtpStore::new();
        store
            .issue("a@example.com", "123456".into(), at(0), EXPIRE, RESEND)
            .await;
        assert_eq!(
            store.verify("a@example.com", "000000", at(1)).await,
            CheckOtp::Mismatch
        );
        assert_eq!(
            store.verify("a@example.com", "123456", at(1)).await,
            CheckOtp::Valid
        );
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive_on_email() {
        let store = OtpStore::new();
        store
            .issue("Someone@Example.COM", "654321".into(), at(0), EXPIRE, RESEND)
            .await;
        assert_eq!(
            store.verify("someone@example.com", "654321", at(1)).await,
            CheckOtp::Valid
        );
    }

    #[tokio::test]
    async fn resend_within_interval_is_rejected() {
        let store = OtpStore::new();
        assert_eq!(
            store
                .issue("a@example.com", "111111".into(), at(0), EXPIRE, RESEND)
                .await,
            IssueOtp::Issued
        );
        assert_eq!(
            store
                .issue("a@example.com", "222222".into(), at(0), EXPIRE, RESEND)
                .await,
            IssueOtp::RateLimited
        );
        // the first code is still the live one
        assert_eq!(
            store.verify("a@example.com", "111111", at(0)).await,
            CheckOtp::Valid
        );
    }

    #[tokio::test]
    async fn reissue_after_interval_replaces_the_code() {
        let store = OtpStore::new();
        store
            .issue("a@example.com", "111111".into(), at(0), EXPIRE, RESEND)
            .await;
        assert_eq!(
            store
                .issue("a@example.com", "222222".into(), at(2), EXPIRE, RESEND)
                .await,
            IssueOtp::Issued
        );
        assert_eq!(
            store.verify("a@example.com", "111111", at(2)).await,
            CheckOtp::Mismatch
        );
        assert_eq!(
            store.verify("a@example.com", "222222", at(2)).await,
            CheckOtp::Valid
        );
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..32 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
