use compact_str::CompactString;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmailOtpConfig {
    pub expire_after: time::Duration,
    pub resend_interval: time::Duration,
}

impl Default for EmailOtpConfig {
    fn default() -> Self {
        Self {
            expire_after: time::Duration::minutes(5),
            resend_interval: time::Duration::minutes(1),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenConfig {
    pub access_ttl: time::Duration,
    pub refresh_ttl: time::Duration,
    pub issuer: CompactString,
    pub audience: CompactString,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl: time::Duration::minutes(15),
            refresh_ttl: time::Duration::days(30),
            issuer: CompactString::const_new("bakehouse"),
            audience: CompactString::const_new("bakehouse-app"),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AuthConfig {
    pub otp: EmailOtpConfig,
    pub token: TokenConfig,
}
