use crate::entities::user_account::{Role, UpdateUserProfile, UserAccount};
use crate::rest::middleware::CurrentUser;
use crate::services::email_login::{
    EmailLoginService, RefreshAccessToken, RefreshAccessTokenResult, SendLoginOtp,
    SendLoginOtpResult, VerifyLoginOtp, VerifyLoginOtpResult,
};
use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;
use uuid::Uuid;

/// Public user shape returned by every auth endpoint.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
}

impl From<UserAccount> for UserSummary {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            name: user.name,
            mobile_number: user.mobile_number,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct SendOtpRequest {
    email: String,
}

#[derive(Debug, serde::Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn send_otp(
    State(service): State<EmailLoginService>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, Error> {
    match service.process(SendLoginOtp { email: body.email }).await? {
        SendLoginOtpResult::Sent => Ok(Json(MessageResponse {
            message: "OTP sent successfully",
        })),
        SendLoginOtpResult::InvalidEmailAddress => {
            Err(Error::validation("Valid email is required"))
        }
        SendLoginOtpResult::RateLimited => Err(Error::validation(
            "Please wait a moment before requesting another code",
        )),
    }
}

#[derive(Debug, serde::Deserialize)]
struct VerifyOtpRequest {
    email: String,
    otp: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    message: &'static str,
    access_token: String,
    refresh_token: String,
    user: UserSummary,
}

async fn verify_otp(
    State(service): State<EmailLoginService>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<LoginResponse>, Error> {
    if body.email.is_empty() || body.otp.is_empty() {
        return Err(Error::validation("Email and OTP are required"));
    }
    match service
        .process(VerifyLoginOtp {
            email: body.email,
            code: body.otp,
        })
        .await?
    {
        VerifyLoginOtpResult::Success(tokens) => Ok(Json(LoginResponse {
            message: "Login successful",
            access_token: tokens.access_token.into_inner(),
            refresh_token: tokens.refresh_token.into_inner(),
            user: tokens.user.into(),
        })),
        VerifyLoginOtpResult::CodeNotFound => Err(Error::validation("OTP not found or expired")),
        VerifyLoginOtpResult::CodeExpired => Err(Error::validation("OTP expired")),
        VerifyLoginOtpResult::CodeMismatch => Err(Error::validation("Invalid OTP")),
        VerifyLoginOtpResult::AccountInactive => Err(Error::Forbidden("Account is inactive")),
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenResponse {
    access_token: String,
    user: UserSummary,
}

async fn refresh_token(
    State(service): State<EmailLoginService>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, Error> {
    if body.refresh_token.is_empty() {
        return Err(Error::validation("Refresh token required"));
    }
    match service
        .process(RefreshAccessToken {
            refresh_token: body.refresh_token,
        })
        .await?
    {
        RefreshAccessTokenResult::Success { access_token, user } => {
            Ok(Json(RefreshTokenResponse {
                access_token: access_token.into_inner(),
                user: (*user).into(),
            }))
        }
        RefreshAccessTokenResult::Invalid => Err(Error::Unauthorized("Invalid refresh token")),
    }
}

async fn me(user: CurrentUser) -> Json<UserSummary> {
    Json(user.0.into())
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    name: Option<String>,
    mobile_number: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct ProfileResponse {
    message: &'static str,
    user: UserSummary,
}

async fn update_profile(
    State(service): State<EmailLoginService>,
    user: CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, Error> {
    let updated = service
        .db
        .process(UpdateUserProfile {
            id: user.id(),
            name: body.name,
            mobile_number: body.mobile_number,
        })
        .await?;
    Ok(Json(ProfileResponse {
        message: "Profile updated",
        user: updated.into(),
    }))
}

pub fn router(service: EmailLoginService) -> Router {
    Router::new()
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/refresh-token", post(refresh_token))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .with_state(service)
}
