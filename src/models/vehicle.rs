//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
    OutOfService,
    PendingApproval,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Rented => "rented",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::OutOfService => "out_of_service",
            VehicleStatus::PendingApproval => "pending_approval",
        }
    }

    /// Estados que solo el ciclo de vida del alquiler puede asignar
    pub fn is_lifecycle_managed(&self) -> bool {
        matches!(self, VehicleStatus::Rented | VehicleStatus::PendingApproval)
    }

    /// Estados que un admin puede fijar manualmente
    pub fn is_admin_settable(&self) -> bool {
        matches!(
            self,
            VehicleStatus::Available | VehicleStatus::Maintenance | VehicleStatus::OutOfService
        )
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(VehicleStatus::Available),
            "rented" => Ok(VehicleStatus::Rented),
            "maintenance" => Ok(VehicleStatus::Maintenance),
            "out_of_service" => Ok(VehicleStatus::OutOfService),
            "pending_approval" => Ok(VehicleStatus::PendingApproval),
            other => Err(format!("Unknown vehicle status '{}'", other)),
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: String,
    pub bond_amount: Decimal,
    pub rent_per_week: Decimal,
    pub current_mileage: i32,
    pub odo_meter: i32,
    pub next_service_date: DateTime<Utc>,
    pub vehicle_type: String,
    pub color: String,
    pub fuel_type: String,
    pub transmission: String,
    pub status: VehicleStatus,
    pub owner_name: Option<String>,
    pub photo_url: Option<String>,
    #[serde(skip_serializing)]
    pub photo_path: Option<String>,
    pub photo_name: Option<String>,
    pub photo_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Nombre legible usado en alertas y emails
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.license_plate)
    }
}

/// Datos para insertar un vehículo nuevo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: String,
    pub bond_amount: Decimal,
    pub rent_per_week: Decimal,
    pub current_mileage: i32,
    pub odo_meter: i32,
    pub next_service_date: DateTime<Utc>,
    pub vehicle_type: String,
    pub color: String,
    pub fuel_type: String,
    pub transmission: String,
    pub owner_name: Option<String>,
}

/// Cambios parciales sobre un vehículo; `None` conserva el valor actual
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub bond_amount: Option<Decimal>,
    pub rent_per_week: Option<Decimal>,
    pub current_mileage: Option<i32>,
    pub odo_meter: Option<i32>,
    pub next_service_date: Option<DateTime<Utc>>,
    pub vehicle_type: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub status: Option<VehicleStatus>,
    pub owner_name: Option<String>,
}

/// Foto almacenada de un vehículo
#[derive(Debug, Clone)]
pub struct VehiclePhoto {
    pub url: String,
    pub path: String,
    pub name: String,
    pub size: i64,
}

/// Contadores de vehículos por estado
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VehicleStats {
    pub total_vehicles: i64,
    pub available_vehicles: i64,
    pub rented_vehicles: i64,
    pub maintenance_vehicles: i64,
    pub pending_approval_vehicles: i64,
    pub out_of_service_vehicles: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            VehicleStatus::Available,
            VehicleStatus::Rented,
            VehicleStatus::Maintenance,
            VehicleStatus::OutOfService,
            VehicleStatus::PendingApproval,
        ] {
            assert_eq!(status.as_str().parse::<VehicleStatus>(), Ok(status));
        }
        assert!("retired".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_admin_settable_statuses() {
        assert!(VehicleStatus::Maintenance.is_admin_settable());
        assert!(!VehicleStatus::Rented.is_admin_settable());
        assert!(!VehicleStatus::PendingApproval.is_admin_settable());
        assert!(VehicleStatus::PendingApproval.is_lifecycle_managed());
    }
}
