use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::{NewVehicle, VehicleChanges, VehicleStatus};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{
    parse_date_field, parse_optional_date_field, validate_counter, validate_license_plate,
    validate_money, validate_not_empty, validate_vin,
};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_not_empty")]
    pub make: String,
    #[validate(custom = "validate_not_empty")]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,
    #[validate(custom = "validate_vin")]
    pub vin: String,
    #[validate(custom = "validate_money")]
    pub bond_amount: Decimal,
    #[validate(custom = "validate_money")]
    pub rent_per_week: Decimal,
    #[validate(custom = "validate_counter")]
    pub current_mileage: i32,
    #[validate(custom = "validate_counter")]
    pub odo_meter: i32,
    pub next_service_date: String,
    #[validate(custom = "validate_not_empty")]
    pub vehicle_type: String,
    #[validate(custom = "validate_not_empty")]
    pub color: String,
    #[validate(custom = "validate_not_empty")]
    pub fuel_type: String,
    #[validate(custom = "validate_not_empty")]
    pub transmission: String,
    pub owner_name: Option<String>,
}

impl CreateVehicleRequest {
    pub fn into_new_vehicle(self) -> AppResult<NewVehicle> {
        Ok(NewVehicle {
            next_service_date: parse_date_field("next_service_date", &self.next_service_date)?,
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            license_plate: self.license_plate.trim().to_uppercase(),
            vin: self.vin.trim().to_uppercase(),
            bond_amount: self.bond_amount,
            rent_per_week: self.rent_per_week,
            current_mileage: self.current_mileage,
            odo_meter: self.odo_meter,
            vehicle_type: self.vehicle_type,
            color: self.color,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            owner_name: self.owner_name.filter(|name| !name.trim().is_empty()),
        })
    }
}

// Request para actualizar un vehículo
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_not_empty")]
    pub make: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,
    #[validate(custom = "validate_vin")]
    pub vin: Option<String>,
    #[validate(custom = "validate_money")]
    pub bond_amount: Option<Decimal>,
    #[validate(custom = "validate_money")]
    pub rent_per_week: Option<Decimal>,
    #[validate(custom = "validate_counter")]
    pub current_mileage: Option<i32>,
    #[validate(custom = "validate_counter")]
    pub odo_meter: Option<i32>,
    pub next_service_date: Option<String>,
    pub vehicle_type: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub status: Option<VehicleStatus>,
    pub owner_name: Option<String>,
}

impl UpdateVehicleRequest {
    /// `rented` y `pending_approval` solo los asigna el ciclo de alquiler
    pub fn into_changes(self) -> AppResult<VehicleChanges> {
        if let Some(status) = self.status {
            if !status.is_admin_settable() {
                return Err(validation_error(
                    "status",
                    "Status can only be set to available, maintenance or out_of_service",
                ));
            }
        }

        Ok(VehicleChanges {
            next_service_date: parse_optional_date_field(
                "next_service_date",
                self.next_service_date.as_deref(),
            )?,
            make: self.make,
            model: self.model,
            year: self.year,
            license_plate: self.license_plate.map(|p| p.trim().to_uppercase()),
            vin: self.vin.map(|v| v.trim().to_uppercase()),
            bond_amount: self.bond_amount,
            rent_per_week: self.rent_per_week,
            current_mileage: self.current_mileage,
            odo_meter: self.odo_meter,
            vehicle_type: self.vehicle_type,
            color: self.color,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            status: self.status,
            owner_name: self.owner_name,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleListQuery {
    pub status: Option<VehicleStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    #[test]
    fn test_update_rejects_lifecycle_status() {
        let request = UpdateVehicleRequest {
            status: Some(VehicleStatus::Rented),
            ..Default::default()
        };
        assert!(matches!(request.into_changes(), Err(AppError::Validation(_))));

        let request = UpdateVehicleRequest {
            status: Some(VehicleStatus::Maintenance),
            ..Default::default()
        };
        let changes = request.into_changes().unwrap();
        assert_eq!(changes.status, Some(VehicleStatus::Maintenance));
    }

    #[test]
    fn test_update_parses_service_date() {
        let request = UpdateVehicleRequest {
            next_service_date: Some("2026-02-01".to_string()),
            ..Default::default()
        };
        assert!(request.into_changes().unwrap().next_service_date.is_some());

        let request = UpdateVehicleRequest {
            next_service_date: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(request.into_changes().is_err());
    }
}
