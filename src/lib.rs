//! Backend de alquiler de vehículos
//!
//! API REST para vehículos, conductores, documentos y solicitudes de
//! alquiler, con autenticación JWT y verificación de email.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::cors_middleware;
use crate::state::AppState;

/// Margen para los campos de texto de un formulario multipart
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Router completo de la aplicación
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", routes::auth_routes::create_auth_router())
        .nest("/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/drivers", routes::driver_routes::create_driver_router())
        .nest("/rentals", routes::rental_routes::create_rental_router())
        .merge(routes::dashboard_routes::create_dashboard_router())
        .nest_service(
            &config.public_upload_path,
            ServeDir::new(&config.upload_dir),
        )
        .layer(DefaultBodyLimit::max(config.max_file_size + MULTIPART_OVERHEAD))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_middleware(&config.cors_origins))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Vehicle Rental API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
