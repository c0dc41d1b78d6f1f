use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::rental::{AppliedTransition, NewRentalApplication, RentalApplication};
use crate::models::vehicle::VehicleStatus;
use crate::utils::errors::AppResult;
use crate::utils::validation::{parse_date_field, validate_not_empty, validate_phone};

// Solicitud de alquiler enviada por un usuario verificado
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRentalRequest {
    pub vehicle_id: Uuid,
    #[validate(custom = "validate_not_empty")]
    pub first_name: String,
    #[validate(custom = "validate_not_empty")]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(custom = "validate_not_empty")]
    pub license_number: String,
    pub license_expiry: String,
    #[validate(custom = "validate_not_empty")]
    pub address: String,
    #[validate(custom = "validate_not_empty")]
    pub emergency_contact: String,
    #[validate(custom = "validate_phone")]
    pub emergency_phone: String,
    #[validate(custom = "validate_not_empty")]
    pub contract_period: String,
}

impl CreateRentalRequest {
    pub fn into_application(self, applicant_user_id: Uuid) -> AppResult<NewRentalApplication> {
        Ok(NewRentalApplication {
            license_expiry: parse_date_field("license_expiry", &self.license_expiry)?,
            vehicle_id: self.vehicle_id,
            applicant_user_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone,
            license_number: self.license_number.trim().to_string(),
            address: self.address,
            emergency_contact: self.emergency_contact,
            emergency_phone: self.emergency_phone,
            contract_period: self.contract_period,
        })
    }
}

/// Decisión del admin; `status` se valida contra `approved`/`rejected`
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: String,
    pub admin_notes: Option<String>,
}

/// Solicitud tras una transición junto con el estado resultante del vehículo
#[derive(Debug, Serialize)]
pub struct RentalTransitionResponse {
    pub application: RentalApplication,
    pub vehicle_status: VehicleStatus,
}

impl From<AppliedTransition> for RentalTransitionResponse {
    fn from(applied: AppliedTransition) -> Self {
        Self {
            application: applied.application,
            vehicle_status: applied.vehicle_status,
        }
    }
}
