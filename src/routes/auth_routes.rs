use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    CreateAdminRequest, LoginRequest, LoginResponse, ResendVerificationRequest,
    ResendVerificationResponse, SignupRequest, SignupResponse, VerifyEmailRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/me", get(me))
        .route("/create-admin", post(create_admin))
}

async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignupResponse>>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.login(request).await?))
}

async fn verify_email(
    State(state): State<AppState>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.verify_email(request).await?))
}

async fn resend_verification(
    State(state): State<AppState>,
    Json(request): Json<ResendVerificationRequest>,
) -> Result<Json<ApiResponse<ResendVerificationResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.resend_verification(request).await?))
}

async fn me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<ApiResponse<UserResponse>> {
    Json(AuthController::new(&state).me(user))
}

async fn create_admin(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.create_admin(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
