//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación y
//! lectura de formularios multipart.

pub mod errors;
pub mod multipart;
pub mod validation;
