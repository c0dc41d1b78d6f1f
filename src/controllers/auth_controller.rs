use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{
    CreateAdminRequest, LoginRequest, LoginResponse, ResendVerificationRequest,
    ResendVerificationResponse, SignupRequest, SignupResponse, VerifyEmailRequest,
};
use crate::dto::ApiResponse;
use crate::models::user::{User, UserResponse};
use crate::services::{AuthService, EmailSender, JwtService};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthController {
    auth: AuthService,
    jwt: Arc<JwtService>,
    email: Arc<dyn EmailSender>,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            jwt: state.jwt.clone(),
            email: state.email.clone(),
        }
    }

    /// Alta de usuario. Un fallo del email no deshace el registro.
    pub async fn signup(&self, request: SignupRequest) -> AppResult<ApiResponse<SignupResponse>> {
        request.validate()?;

        let user = self.auth.create(&request.email, &request.password).await?;
        let email_sent = match user.verification_token.as_deref() {
            Some(token) => self.email.send_verification(&user.email, token).await,
            None => false,
        };
        if !email_sent {
            warn!("⚠️  Verification email for {} was not delivered", user.email);
        }
        info!("👤 User registered: {}", user.email);

        Ok(ApiResponse::success_with_message(
            SignupResponse {
                user: user.into(),
                email_sent,
            },
            "Account created. Please check your email to verify your account",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
        request.validate()?;

        let user = self
            .auth
            .verify_credentials(&request.email, &request.password)
            .await?;
        if !user.is_verified {
            return Err(AppError::EmailNotVerified);
        }

        let token = self.jwt.generate_access_token(user.id)?;
        let expires_in = self.jwt.access_token_duration().num_seconds();
        info!("🔑 Login: {}", user.email);

        Ok(ApiResponse::success(LoginResponse::bearer(
            token,
            expires_in,
            user.into(),
        )))
    }

    pub async fn verify_email(
        &self,
        request: VerifyEmailRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;

        let user = self.auth.verify_email(request.token.trim()).await?;
        info!("✅ Email verified: {}", user.email);
        Ok(ApiResponse::success_with_message(
            user.into(),
            "Email verified successfully",
        ))
    }

    pub async fn resend_verification(
        &self,
        request: ResendVerificationRequest,
    ) -> AppResult<ApiResponse<ResendVerificationResponse>> {
        request.validate()?;

        let (user, token) = self.auth.rotate_verification_token(&request.email).await?;
        let email_sent = self.email.send_verification(&user.email, &token).await;

        Ok(ApiResponse::success_with_message(
            ResendVerificationResponse { email_sent },
            "Verification email sent",
        ))
    }

    pub fn me(&self, user: User) -> ApiResponse<UserResponse> {
        ApiResponse::success(user.into())
    }

    pub async fn create_admin(
        &self,
        request: CreateAdminRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;

        let admin = self.auth.create_admin(&request.email, &request.password).await?;
        Ok(ApiResponse::success_with_message(
            admin.into(),
            "Admin user created",
        ))
    }
}
