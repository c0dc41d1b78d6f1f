use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::document_controller::DocumentController;
use crate::controllers::driver_controller::DriverController;
use crate::dto::document_dto::UpdateExpiryRequest;
use crate::dto::driver_dto::{
    ContractUpdateRequest, CreateDriverRequest, DriverListQuery, PaymentUpdateRequest,
    UpdateDriverRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::{AdminUser, VerifiedUser};
use crate::models::document::{Document, DocumentOwner};
use crate::models::driver::{Driver, DriverStats};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::multipart::MultipartForm;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_driver).get(list_drivers))
        .route("/stats/overview", get(driver_stats))
        .route("/:id", get(get_driver).put(update_driver).delete(delete_driver))
        .route("/:id/contract", post(update_contract))
        .route("/:id/payment", post(update_payment))
        .route("/:id/documents", post(upload_document).get(list_documents))
        .route("/:id/documents/:doc_id", delete(delete_document))
        .route("/:id/documents/:doc_id/expiry", put(update_document_expiry))
        .route("/:id/documents/:doc_id/download", get(download_document))
}

async fn create_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<CreateDriverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Driver>>), AppError> {
    let controller = DriverController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_drivers(
    State(state): State<AppState>,
    _user: VerifiedUser,
    Query(query): Query<DriverListQuery>,
) -> Result<Json<ApiResponse<Vec<Driver>>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(ApiResponse::success(controller.list(query).await?)))
}

async fn get_driver(
    State(state): State<AppState>,
    _user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn update_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DriverController::new(&state);
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Driver deleted successfully")))
}

async fn update_contract(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ContractUpdateRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.update_contract(id, request).await?))
}

async fn update_payment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentUpdateRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.update_payment(id, request).await?))
}

async fn driver_stats(
    State(state): State<AppState>,
    _user: VerifiedUser,
) -> Result<Json<ApiResponse<DriverStats>>, AppError> {
    let controller = DriverController::new(&state);
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
    let document = controller.upload(DocumentOwner::Driver(id), form).await?;
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
    let documents = controller.list(DocumentOwner::Driver(id)).await?;
    Ok(Json(ApiResponse::success(documents)))
}

async fn delete_document(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DocumentController::new(&state);
    controller.delete(DocumentOwner::Driver(id), doc_id).await?;
    Ok(Json(ApiResponse::message("Document deleted successfully")))
}

async fn update_document_expiry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateExpiryRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let controller = DocumentController::new(&state);
    let document = controller
        .update_expiry(DocumentOwner::Driver(id), doc_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(document, "Expiry date updated")))
}

async fn download_document(
    State(state): State<AppState>,
    _user: VerifiedUser,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    let controller = DocumentController::new(&state);
    let (document, contents) = controller.download(id, doc_id).await?;
    Ok((attachment_headers(&document.file_name), contents).into_response())
}

fn attachment_headers(file_name: &str) -> [(HeaderName, HeaderValue); 2] {
    let content_type = mime_guess::from_path(file_name).first_or_octet_stream();
    let content_type = HeaderValue::from_str(content_type.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    // Nombres no ASCII caen a un attachment sin nombre
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_DISPOSITION, disposition),
    ]
}
