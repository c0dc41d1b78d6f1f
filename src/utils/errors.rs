//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Vehicle unavailable: {0}")]
    VehicleUnavailable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),

    #[error("Invalid verification token")]
    InvalidToken,

    #[error("Email already verified")]
    AlreadyVerified,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Código estable que acompaña a cada respuesta de error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::VehicleUnavailable(_) => "VEHICLE_UNAVAILABLE",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InvalidOutcome(_) => "INVALID_OUTCOME",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::AlreadyVerified => "ALREADY_VERIFIED",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InvalidOutcome(_)
            | AppError::InvalidToken
            | AppError::AlreadyVerified => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::EmailNotVerified | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::InvalidTransition(_)
            | AppError::VehicleUnavailable(_) => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Hash(_)
            | AppError::Jwt(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = Some(self.code().to_string());

        let error_response = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                ErrorResponse {
                    error: "Database Error".to_string(),
                    message: "An error occurred while accessing the database".to_string(),
                    details: None,
                    code,
                }
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code,
                }
            }

            AppError::Unauthorized(msg) => ErrorResponse {
                error: "Unauthorized".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::InvalidCredentials => ErrorResponse {
                error: "Unauthorized".to_string(),
                message: "Invalid email or password".to_string(),
                details: None,
                code,
            },

            AppError::EmailNotVerified => ErrorResponse {
                error: "Forbidden".to_string(),
                message: "Please verify your email before continuing".to_string(),
                details: None,
                code,
            },

            AppError::Forbidden(msg) => ErrorResponse {
                error: "Forbidden".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::NotFound(msg) => ErrorResponse {
                error: "Not Found".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::Conflict(msg) => ErrorResponse {
                error: "Conflict".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::InvalidTransition(msg) => ErrorResponse {
                error: "Invalid Transition".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::VehicleUnavailable(msg) => ErrorResponse {
                error: "Vehicle Unavailable".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::BadRequest(msg) => ErrorResponse {
                error: "Bad Request".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::InvalidOutcome(value) => ErrorResponse {
                error: "Bad Request".to_string(),
                message: "Status must be 'approved' or 'rejected'".to_string(),
                details: Some(json!({ "status": value })),
                code,
            },

            AppError::InvalidToken => ErrorResponse {
                error: "Bad Request".to_string(),
                message: "Invalid verification token".to_string(),
                details: None,
                code,
            },

            AppError::AlreadyVerified => ErrorResponse {
                error: "Bad Request".to_string(),
                message: "Email already verified".to_string(),
                details: None,
                code,
            },

            AppError::Storage(msg) => {
                error!("❌ Storage error: {}", msg);
                ErrorResponse {
                    error: "Storage Error".to_string(),
                    message: "An error occurred while storing the file".to_string(),
                    details: None,
                    code,
                }
            }

            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                ErrorResponse {
                    error: "Hash Error".to_string(),
                    message: "An error occurred while processing credentials".to_string(),
                    details: None,
                    code,
                }
            }

            AppError::Jwt(msg) => {
                error!("❌ JWT error: {}", msg);
                ErrorResponse {
                    error: "JWT Error".to_string(),
                    message: "An error occurred while issuing the token".to_string(),
                    details: None,
                    code,
                }
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: None,
                    code,
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

/// Violación de constraint UNIQUE (`23505`)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map_or(false, |code| code == "23505")
}

/// Traduce violaciones de constraints de PostgreSQL a errores de dominio
///
/// `23505` (unique) se convierte en `Conflict` y `23503` (foreign key) en
/// `NotFound` de la entidad referenciada; el resto queda como `Database`.
pub fn map_db_error(err: sqlx::Error, resource: &str, referenced: &str) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unique field").to_string();
                return AppError::Conflict(format!(
                    "{} violates unique constraint '{}'",
                    resource, constraint
                ));
            }
            Some("23503") => return not_found_error(referenced),
            _ => {}
        }
    }
    AppError::Database(err)
}
