//! Extractores de autenticación JWT
//!
//! Cada handler declara lo que necesita por el tipo que recibe:
//! `AuthUser` (token válido), `VerifiedUser` (además email verificado) o
//! `AdminUser` (rol admin). Se ejecutan antes de leer el body.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Extrae el token de un header `Authorization: Bearer <token>`
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Usuario con token válido
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Usuario autenticado con email verificado
#[derive(Debug, Clone)]
pub struct VerifiedUser(pub User);

/// Usuario autenticado con rol admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

        let user_id = state.jwt.verify(token)?;
        let user = state.auth.find_user(user_id).await?.ok_or_else(|| {
            debug!("Token subject {} no longer exists", user_id);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_verified {
            return Err(AppError::EmailNotVerified);
        }
        Ok(VerifiedUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}
