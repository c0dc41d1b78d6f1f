//! DTOs de la API
//!
//! Requests validados con `validator` y responses por endpoint.

pub mod auth_dto;
pub mod common;
pub mod dashboard_dto;
pub mod document_dto;
pub mod driver_dto;
pub mod rental_dto;
pub mod vehicle_dto;

pub use common::ApiResponse;
