use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::document_controller::DocumentController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::document_dto::UpdateExpiryRequest;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery};
use crate::dto::ApiResponse;
use crate::middleware::{AdminUser, VerifiedUser};
use crate::models::document::{Document, DocumentOwner};
use crate::models::vehicle::{Vehicle, VehicleStats};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::multipart::MultipartForm;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/stats/overview", get(vehicle_stats))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/photo", post(upload_photo))
        .route("/:id/documents", post(upload_document).get(list_documents))
        .route("/:id/documents/:doc_id/expiry", put(update_document_expiry))
        .route("/:id/documents/:doc_id", delete(delete_document))
}

async fn create_vehicle(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    _user: VerifiedUser,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(ApiResponse::success(controller.list(query).await?)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    _user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(&state);
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Vehicle deleted successfully")))
}

async fn upload_photo(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let form = MultipartForm::read(multipart, "file").await?;
    let controller = VehicleController::new(&state);
    Ok(Json(controller.upload_photo(id, form).await?))
}

async fn vehicle_stats(
    State(state): State<AppState>,
    _user: VerifiedUser,
) -> Result<Json<ApiResponse<VehicleStats>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn upload_document(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), AppError> {
    let form = MultipartForm::read(multipart, "file").await?;
    let controller = DocumentController::new(&state);
    let document = controller.upload(DocumentOwner::Vehicle(id), form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(document, "Document uploaded successfully")),
    ))
}

async fn list_documents(
    State(state): State<AppState>,
    _user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let controller = DocumentController::new(&state);
    let documents = controller.list(DocumentOwner::Vehicle(id)).await?;
    Ok(Json(ApiResponse::success(documents)))
}

async fn update_document_expiry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateExpiryRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let controller = DocumentController::new(&state);
    let document = controller
        .update_expiry(DocumentOwner::Vehicle(id), doc_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(document, "Expiry date updated")))
}

async fn delete_document(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DocumentController::new(&state);
    controller.delete(DocumentOwner::Vehicle(id), doc_id).await?;
    Ok(Json(ApiResponse::message("Document deleted successfully")))
}
