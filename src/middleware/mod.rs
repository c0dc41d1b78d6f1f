//! Middleware del sistema
//!
//! Extractores de autenticación y configuración de CORS.

pub mod auth;
pub mod cors;

pub use auth::{AdminUser, AuthUser, VerifiedUser};
pub use cors::cors_middleware;
