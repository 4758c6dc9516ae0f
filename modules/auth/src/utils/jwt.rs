use crate::config::TokenConfig;
use compact_str::CompactString;
use framework::Error;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// Access JWT token string
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl AccessToken {
    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn new(inner: impl AsRef<str>) -> Self {
        Self(inner.as_ref().to_owned())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken([REDACTED])")
    }
}

/// Refresh JWT token string
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl AsRef<str> for RefreshToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl RefreshToken {
    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn new(inner: impl AsRef<str>) -> Self {
        Self(inner.as_ref().to_owned())
    }
}

impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RefreshToken([REDACTED])")
    }
}

/// Claims stored in generated JWT tokens
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub sub: Uuid,
    pub exp: usize,
    pub iss: CompactString,
    pub aud: CompactString,
}

/// Signs and verifies the access/refresh token pair. The two token kinds use
/// separate secrets, so a refresh token never authenticates a request.
#[derive(Clone)]
pub struct JwtSigner {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    config: TokenConfig,
}

impl JwtSigner {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8], config: TokenConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
            config,
        }
    }

    fn claims(&self, user_id: Uuid, ttl: time::Duration) -> TokenClaims {
        let exp = time::OffsetDateTime::now_utc() + ttl;
        TokenClaims {
            sub: user_id,
            exp: exp.unix_timestamp().max(0) as usize,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation
    }

    pub fn issue_access(&self, user_id: Uuid) -> Result<AccessToken, Error> {
        let claims = self.claims(user_id, self.config.access_ttl);
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| Error::BusinessPanic(e.into()))?;
        Ok(AccessToken(token))
    }

    pub fn issue_refresh(&self, user_id: Uuid) -> Result<RefreshToken, Error> {
        let claims = self.claims(user_id, self.config.refresh_ttl);
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| Error::BusinessPanic(e.into()))?;
        Ok(RefreshToken(token))
    }

    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, Error> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.access_decoding, &self.validation())
            .map(|data| data.claims)
            .map_err(|_| Error::Unauthorized("Invalid token"))
    }

    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, Error> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.refresh_decoding, &self.validation())
            .map(|data| data.claims)
            .map_err(|_| Error::Unauthorized("Invalid refresh token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> JwtSigner {
        JwtSigner::new(b"access-secret", b"refresh-secret", TokenConfig::default())
    }

    #[test]
    fn access_token_round_trips() {
        let signer = signer();
        let user_id = Uuid::new_v4();
        let token = signer.issue_access(user_id).unwrap();
        let claims = signer.verify_access(token.as_ref()).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn refresh_secret_does_not_verify_access_tokens() {
        let signer = signer();
        let refresh = signer.issue_refresh(Uuid::new_v4()).unwrap();
        assert!(signer.verify_access(refresh.as_ref()).is_err());

        let access = signer.issue_access(Uuid::new_v4()).unwrap();
        assert!(signer.verify_refresh(access.as_ref()).is_err());
    }

    #[test]
    fn issuer_mismatch_is_rejected() {
        let signer = signer();
        let other = JwtSigner::new(
            b"access-secret",
            b"refresh-secret",
            TokenConfig {
                issuer: CompactString::const_new("someone-else"),
                ..TokenConfig::default()
            },
        );
        let token = other.issue_access(Uuid::new_v4()).unwrap();
        assert!(signer.verify_access(token.as_ref()).is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let signer = signer();
        let token = signer.issue_access(Uuid::new_v4()).unwrap();
        assert_eq!(format!("{token:?}"), "AccessToken([REDACTED])");
    }
}
