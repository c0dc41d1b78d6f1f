use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::rental_controller::RentalController;
use crate::dto::rental_dto::{CreateRentalRequest, DecisionRequest, RentalTransitionResponse};
use crate::dto::ApiResponse;
use crate::middleware::{AdminUser, VerifiedUser};
use crate::models::rental::{RentalApplication, RentalFilters, RentalStats};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::multipart::MultipartForm;

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_application).get(list_applications))
        .route("/mine", get(list_my_applications))
        .route("/stats/overview", get(rental_stats))
        .route("/:id", get(get_application).delete(delete_application))
        .route("/:id/payment-receipt", post(upload_payment_receipt))
        .route("/:id/decision", put(decide_application))
}

async fn submit_application(
    State(state): State<AppState>,
    VerifiedUser(user): VerifiedUser,
    Json(request): Json<CreateRentalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RentalApplication>>), AppError> {
    let controller = RentalController::new(&state);
    let response = controller.submit(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(filters): Query<RentalFilters>,
) -> Result<Json<ApiResponse<Vec<RentalApplication>>>, AppError> {
    let controller = RentalController::new(&state);
    Ok(Json(ApiResponse::success(controller.list(filters).await?)))
}

async fn list_my_applications(
    State(state): State<AppState>,
    VerifiedUser(user): VerifiedUser,
) -> Result<Json<ApiResponse<Vec<RentalApplication>>>, AppError> {
    let controller = RentalController::new(&state);
    Ok(Json(ApiResponse::success(controller.list_mine(&user).await?)))
}

async fn get_application(
    State(state): State<AppState>,
    VerifiedUser(user): VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RentalApplication>>, AppError> {
    let controller = RentalController::new(&state);
    Ok(Json(ApiResponse::success(controller.get_for(&user, id).await?)))
}

async fn upload_payment_receipt(
    State(state): State<AppState>,
    VerifiedUser(user): VerifiedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<RentalTransitionResponse>>, AppError> {
    let form = MultipartForm::read(multipart, "file").await?;
    let controller = RentalController::new(&state);
    Ok(Json(controller.attach_payment_receipt(&user, id, form).await?))
}

async fn decide_application(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<RentalTransitionResponse>>, AppError> {
    let controller = RentalController::new(&state);
    Ok(Json(controller.decide(&admin, id, request).await?))
}

async fn delete_application(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RentalController::new(&state);
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Rental application deleted successfully")))
}

async fn rental_stats(
    State(state): State<AppState>,
    _user: VerifiedUser,
) -> Result<Json<ApiResponse<RentalStats>>, AppError> {
    let controller = RentalController::new(&state);
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}
