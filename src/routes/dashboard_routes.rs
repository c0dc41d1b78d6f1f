use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardStats;
use crate::dto::ApiResponse;
use crate::middleware::AdminUser;
use crate::models::document::DOCUMENT_TYPES;
use crate::services::document_expiry_service::{DocumentStats, ExpiryAlert};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de nivel raíz: dashboard, alertas de vencimiento y catálogo
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/dashboard/document-stats", get(document_stats))
        .route("/document-expiry-alerts", get(document_expiry_alerts))
        .route("/document-types", get(document_types))
}

async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn document_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<DocumentStats>>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(ApiResponse::success(controller.document_stats().await?)))
}

async fn document_expiry_alerts(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<ExpiryAlert>>>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(ApiResponse::success(controller.expiry_alerts().await?)))
}

async fn document_types() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(DOCUMENT_TYPES.to_vec()))
}
