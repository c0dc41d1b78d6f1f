//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod document;
pub mod driver;
pub mod rental;
pub mod user;
pub mod vehicle;
