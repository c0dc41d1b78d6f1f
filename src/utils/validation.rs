//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos usadas por los DTOs y controladores.

use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::utils::errors::{validation_error, AppResult};

lazy_static! {
    // VIN ISO 3779: 17 caracteres, sin I, O ni Q
    static ref VIN_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("valid VIN regex");
    static ref PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z0-9][A-Z0-9 \-]{0,10}[A-Z0-9]$").expect("valid plate regex");
}

/// Longitud mínima de contraseña aceptada en signup
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validar fortaleza mínima de la contraseña
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password_strength");
        error.message = Some("Password must be at least 6 characters long".into());
        error.add_param("min".into(), &MIN_PASSWORD_LENGTH);
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    if !PLATE_REGEX.is_match(&value.to_uppercase()) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de VIN
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    if !VIN_REGEX.is_match(&value.to_uppercase()) {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"17 characters, no I/O/Q".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(8..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Variante para montos monetarios
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(value)
}

/// Variante para contadores enteros (kilometraje, odómetro)
pub fn validate_counter(value: i32) -> Result<(), ValidationError> {
    validate_non_negative(&value)
}

/// Convertir una fecha de vencimiento textual a `DateTime<Utc>`
///
/// Acepta RFC 3339 (`2025-12-31T00:00:00Z`), datetime sin zona
/// (`2025-12-31T00:00:00`, interpretado como UTC) y fecha simple
/// (`2025-12-31`, medianoche UTC). Devuelve `None` para cualquier otro formato.
pub fn parse_expiry_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Fecha obligatoria de un request; `Validation` sobre `field` si no se reconoce
pub fn parse_date_field(field: &'static str, value: &str) -> AppResult<DateTime<Utc>> {
    parse_expiry_date(value)
        .ok_or_else(|| validation_error(field, "Invalid date, expected YYYY-MM-DD or RFC 3339"))
}

/// Fecha opcional: ausente o vacía es `None`
pub fn parse_optional_date_field(
    field: &'static str,
    value: Option<&str>,
) -> AppResult<Option<DateTime<Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date_field(field, v).map(Some),
        None => Ok(None),
    }
}
