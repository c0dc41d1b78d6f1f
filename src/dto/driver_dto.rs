use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::{ContractChanges, DriverChanges, DriverStatus, NewDriver, PaymentChanges};
use crate::utils::errors::AppResult;
use crate::utils::validation::{
    parse_date_field, parse_optional_date_field, validate_money, validate_not_empty, validate_phone,
};

// Request para registrar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
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
    pub selected_vehicle_id: Option<Uuid>,
    pub contract_period: Option<String>,
    #[validate(custom = "validate_money")]
    pub bond_amount: Option<Decimal>,
    #[validate(custom = "validate_money")]
    pub weekly_rent: Option<Decimal>,
}

impl CreateDriverRequest {
    pub fn into_new_driver(self) -> AppResult<NewDriver> {
        Ok(NewDriver {
            license_expiry: parse_date_field("license_expiry", &self.license_expiry)?,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone,
            license_number: self.license_number.trim().to_string(),
            address: self.address,
            emergency_contact: self.emergency_contact,
            emergency_phone: self.emergency_phone,
            selected_vehicle_id: self.selected_vehicle_id,
            contract_period: self.contract_period,
            bond_amount: self.bond_amount,
            weekly_rent: self.weekly_rent,
        })
    }
}

// Request para actualizar un conductor
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(custom = "validate_not_empty")]
    pub first_name: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub license_expiry: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    #[validate(custom = "validate_phone")]
    pub emergency_phone: Option<String>,
    pub selected_vehicle_id: Option<Uuid>,
    pub status: Option<DriverStatus>,
}

impl UpdateDriverRequest {
    pub fn into_changes(self) -> AppResult<DriverChanges> {
        Ok(DriverChanges {
            license_expiry: parse_optional_date_field("license_expiry", self.license_expiry.as_deref())?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.map(|e| e.trim().to_lowercase()),
            phone: self.phone,
            license_number: self.license_number,
            address: self.address,
            emergency_contact: self.emergency_contact,
            emergency_phone: self.emergency_phone,
            selected_vehicle_id: self.selected_vehicle_id,
            status: self.status,
            ..Default::default()
        })
    }
}

// Request para actualizar el contrato
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContractUpdateRequest {
    pub contract_start_date: Option<String>,
    pub contract_end_date: Option<String>,
    pub contract_period: Option<String>,
    #[validate(custom = "validate_money")]
    pub bond_amount: Option<Decimal>,
    #[validate(custom = "validate_money")]
    pub weekly_rent: Option<Decimal>,
    pub contract_signed: Option<bool>,
}

impl ContractUpdateRequest {
    pub fn into_changes(self) -> AppResult<DriverChanges> {
        let contract = ContractChanges {
            contract_start_date: parse_optional_date_field(
                "contract_start_date",
                self.contract_start_date.as_deref(),
            )?,
            contract_end_date: parse_optional_date_field(
                "contract_end_date",
                self.contract_end_date.as_deref(),
            )?,
            contract_period: self.contract_period,
            bond_amount: self.bond_amount,
            weekly_rent: self.weekly_rent,
            contract_signed: self.contract_signed,
        };

        Ok(DriverChanges {
            contract,
            ..Default::default()
        })
    }
}

// Request para marcar el pago del conductor
#[derive(Debug, Deserialize)]
pub struct PaymentUpdateRequest {
    pub payment_receipt_uploaded: bool,
    pub payment_receipt_url: Option<String>,
}

impl PaymentUpdateRequest {
    pub fn into_changes(self) -> DriverChanges {
        DriverChanges {
            payment: PaymentChanges {
                payment_receipt_uploaded: Some(self.payment_receipt_uploaded),
                payment_receipt_url: self.payment_receipt_url,
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DriverListQuery {
    pub status: Option<DriverStatus>,
}
