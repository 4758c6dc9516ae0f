use crate::config::AuthConfig;
use crate::entities::otp_store::{self, CheckOtp, IssueOtp, OtpStore};
use crate::entities::user_account::{
    CreateCustomerAccount, FindUserAccountByEmail, FindUserAccountById, UserAccount,
};
use crate::utils::jwt::{AccessToken, JwtSigner, RefreshToken};
use framework::mailer::Mailer;
use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct EmailLoginService {
    pub db: DatabaseProcessor,
    pub otp_store: OtpStore,
    pub mailer: Mailer,
    pub jwt: Arc<JwtSigner>,
    pub config: Arc<AuthConfig>,
}

#[derive(Debug, Clone)]
pub struct SendLoginOtp {
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendLoginOtpResult {
    Sent,
    InvalidEmailAddress,
    RateLimited,
}

impl Processor<SendLoginOtp> for EmailLoginService {
    type Output = SendLoginOtpResult;
    type Error = framework::Error;
    #[instrument(skip_all, err)]
    async fn process(&self, input: SendLoginOtp) -> Result<SendLoginOtpResult, framework::Error> {
        if input.email.parse::<lettre::Address>().is_err() {
            return Ok(SendLoginOtpResult::InvalidEmailAddress);
        }
        let email = input.email.to_lowercase();

        let code = otp_store::generate_otp_code();
        let issued = self
            .otp_store
            .issue(
                &email,
                code.clone(),
                framework::now_time(),
                self.config.otp.expire_after,
                self.config.otp.resend_interval,
            )
            .await;
        if issued == IssueOtp::RateLimited {
            return Ok(SendLoginOtpResult::RateLimited);
        }

        self.mailer
            .send_otp(&email, &code, self.config.otp.expire_after)
            .await?;
        Ok(SendLoginOtpResult::Sent)
    }
}

#[derive(Debug, Clone)]
pub struct VerifyLoginOtp {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub user: UserAccount,
}

#[derive(Debug, Clone)]
pub enum VerifyLoginOtpResult {
    Success(Box<LoginTokens>),
    CodeNotFound,
    CodeExpired,
    CodeMismatch,
    AccountInactive,
}

impl Processor<VerifyLoginOtp> for EmailLoginService {
    type Output = VerifyLoginOtpResult;
    type Error = framework::Error;
    #[instrument(skip_all, err)]
    async fn process(
        &self,
        input: VerifyLoginOtp,
    ) -> Result<VerifyLoginOtpResult, framework::Error> {
        let email = input.email.to_lowercase();
        match self
            .otp_store
            .verify(&email, &input.code, framework::now_time())
            .await
        {
            CheckOtp::NotFound => return Ok(VerifyLoginOtpResult::CodeNotFound),
            CheckOtp::Expired => return Ok(VerifyLoginOtpResult::CodeExpired),
            CheckOtp::Mismatch => return Ok(VerifyLoginOtpResult::CodeMismatch),
            CheckOtp::Valid => {}
        }

        let user = match self
            .db
            .process(FindUserAccountByEmail {
                email: email.clone(),
            })
            .await?
        {
            Some(user) => user,
            None => self.db.process(CreateCustomerAccount { email }).await?,
        };

        if !user.is_active {
            return Ok(VerifyLoginOtpResult::AccountInactive);
        }

        let access_token = self.jwt.issue_access(user.id)?;
        let refresh_token = self.jwt.issue_refresh(user.id)?;
        Ok(VerifyLoginOtpResult::Success(Box::new(LoginTokens {
            access_token,
            refresh_token,
            user,
        })))
    }
}

#[derive(Debug, Clone)]
pub struct RefreshAccessToken {
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub enum RefreshAccessTokenResult {
    Success {
        access_token: AccessToken,
        user: Box<UserAccount>,
    },
    Invalid,
}

impl Processor<RefreshAccessToken> for EmailLoginService {
    type Output = RefreshAccessTokenResult;
    type Error = framework::Error;
    #[instrument(skip_all, err)]
    async fn process(
        &self,
        input: RefreshAccessToken,
    ) -> Result<RefreshAccessTokenResult, framework::Error> {
        let Ok(claims) = self.jwt.verify_refresh(&input.refresh_token) else {
            return Ok(RefreshAccessTokenResult::Invalid);
        };
        let Some(user) = self.db.process(FindUserAccountById { id: claims.sub }).await? else {
            return Ok(RefreshAccessTokenResult::Invalid);
        };
        if !user.is_active {
            return Ok(RefreshAccessTokenResult::Invalid);
        }
        let access_token = self.jwt.issue_access(user.id)?;
        Ok(RefreshAccessTokenResult::Success {
            access_token,
            user: Box::new(user),
        })
    }
}
