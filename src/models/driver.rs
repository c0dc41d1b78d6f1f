//! Modelo de Driver
//!
//! Conductores registrados por la administración, con datos de licencia,
//! contacto de emergencia y contrato.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del conductor - mapea al ENUM driver_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Pending,
    Active,
    Inactive,
    Suspended,
}

/// Driver - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_expiry: DateTime<Utc>,
    pub address: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub selected_vehicle_id: Option<Uuid>,
    pub contract_start_date: Option<DateTime<Utc>>,
    pub contract_end_date: Option<DateTime<Utc>>,
    pub contract_period: Option<String>,
    pub bond_amount: Option<Decimal>,
    pub weekly_rent: Option<Decimal>,
    pub contract_signed: bool,
    pub payment_receipt_uploaded: bool,
    pub payment_receipt_url: Option<String>,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_expiry: DateTime<Utc>,
    pub address: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub selected_vehicle_id: Option<Uuid>,
    pub contract_period: Option<String>,
    pub bond_amount: Option<Decimal>,
    pub weekly_rent: Option<Decimal>,
}

/// Cambios parciales sobre un conductor; `None` conserva el valor actual
#[derive(Debug, Clone, Default)]
pub struct DriverChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub license_expiry: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub selected_vehicle_id: Option<Uuid>,
    pub status: Option<DriverStatus>,
    pub contract: ContractChanges,
    pub payment: PaymentChanges,
}

/// Campos de contrato
#[derive(Debug, Clone, Default)]
pub struct ContractChanges {
    pub contract_start_date: Option<DateTime<Utc>>,
    pub contract_end_date: Option<DateTime<Utc>>,
    pub contract_period: Option<String>,
    pub bond_amount: Option<Decimal>,
    pub weekly_rent: Option<Decimal>,
    pub contract_signed: Option<bool>,
}

/// Campos de pago
#[derive(Debug, Clone, Default)]
pub struct PaymentChanges {
    pub payment_receipt_uploaded: Option<bool>,
    pub payment_receipt_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DriverStats {
    pub total_drivers: i64,
    pub active_drivers: i64,
    pub pending_drivers: i64,
    pub suspended_drivers: i64,
}
