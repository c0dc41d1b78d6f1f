//! Modelo de RentalApplication y ciclo de vida
//!
//! Una solicitud de alquiler avanza `pending -> payment_received -> approved`
//! o termina en `rejected`. La tabla de transiciones vive en [`plan`], que es
//! pura: recibe el estado actual de la solicitud y del vehículo y decide el
//! siguiente estado de ambos. Los repositorios aplican el plan dentro de una
//! transacción.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::vehicle::VehicleStatus;
use crate::utils::errors::{AppError, AppResult};

/// Estado de la solicitud - mapea al ENUM rental_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "rental_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    Pending,
    PaymentReceived,
    Approved,
    Rejected,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "pending",
            RentalStatus::PaymentReceived => "payment_received",
            RentalStatus::Approved => "approved",
            RentalStatus::Rejected => "rejected",
        }
    }

    /// La solicitud reserva el vehículo
    pub fn holds_vehicle(&self) -> bool {
        matches!(self, RentalStatus::PaymentReceived | RentalStatus::Approved)
    }

    /// La solicitud sigue viva y bloquea el borrado del vehículo
    pub fn is_open(&self) -> bool {
        !matches!(self, RentalStatus::Rejected)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RentalApplication - mapea exactamente a la tabla rental_applications
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RentalApplication {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub applicant_user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_expiry: DateTime<Utc>,
    pub address: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub contract_period: String,
    pub status: RentalStatus,
    pub admin_notes: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub payment_receipt_url: Option<String>,
    #[serde(skip_serializing)]
    pub payment_receipt_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRentalApplication {
    pub vehicle_id: Uuid,
    pub applicant_user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_expiry: DateTime<Utc>,
    pub address: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub contract_period: String,
}

/// Filtros del listado de administración
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RentalFilters {
    pub status: Option<RentalStatus>,
    pub vehicle_id: Option<Uuid>,
}

/// Resultado de la decisión de un admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl FromStr for Decision {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Decision::Approved),
            "rejected" => Ok(Decision::Rejected),
            other => Err(AppError::InvalidOutcome(other.to_string())),
        }
    }
}

/// Eventos que mueven una solicitud
#[derive(Debug, Clone)]
pub enum RentalEvent {
    PaymentReceipt {
        url: String,
        path: String,
    },
    Decide {
        decision: Decision,
        notes: Option<String>,
        processed_by: String,
    },
}

impl RentalEvent {
    fn verb(&self) -> &'static str {
        match self {
            RentalEvent::PaymentReceipt { .. } => "attach a payment receipt to",
            RentalEvent::Decide { decision: Decision::Approved, .. } => "approve",
            RentalEvent::Decide { decision: Decision::Rejected, .. } => "reject",
        }
    }
}

/// Estado observado bajo lock antes de transicionar
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub current: RentalStatus,
    pub vehicle_status: VehicleStatus,
    /// Otra solicitud del mismo vehículo está en `payment_received` o `approved`
    pub held_by_other: bool,
}

/// Siguiente estado de la solicitud y, si cambia, del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub next: RentalStatus,
    pub vehicle_status: Option<VehicleStatus>,
}

/// Tabla de transiciones del ciclo de vida
///
/// | desde            | evento          | hacia            | vehículo          |
/// |------------------|-----------------|------------------|-------------------|
/// | pending          | payment receipt | payment_received | pending_approval  |
/// | payment_received | payment receipt | payment_received | pending_approval  |
/// | payment_received | approve         | approved         | rented            |
/// | pending          | reject          | rejected         | sin cambio        |
/// | payment_received | reject          | rejected         | available         |
///
/// Cualquier otra combinación es `InvalidTransition`.
pub fn plan(ctx: &TransitionContext, event: &RentalEvent) -> AppResult<TransitionPlan> {
    use RentalStatus::*;

    match (ctx.current, event) {
        (Pending | PaymentReceived, RentalEvent::PaymentReceipt { .. }) => {
            if ctx.held_by_other {
                return Err(AppError::VehicleUnavailable(
                    "Vehicle is already reserved by another application".to_string(),
                ));
            }
            if matches!(
                ctx.vehicle_status,
                VehicleStatus::Maintenance | VehicleStatus::OutOfService
            ) {
                return Err(AppError::VehicleUnavailable(format!(
                    "Vehicle is {}",
                    ctx.vehicle_status
                )));
            }
            Ok(TransitionPlan {
                next: PaymentReceived,
                vehicle_status: Some(VehicleStatus::PendingApproval),
            })
        }
        (
            PaymentReceived,
            RentalEvent::Decide {
                decision: Decision::Approved,
                ..
            },
        ) => Ok(TransitionPlan {
            next: Approved,
            vehicle_status: Some(VehicleStatus::Rented),
        }),
        (
            Pending,
            RentalEvent::Decide {
                decision: Decision::Rejected,
                ..
            },
        ) => Ok(TransitionPlan {
            next: Rejected,
            vehicle_status: None,
        }),
        (
            PaymentReceived,
            RentalEvent::Decide {
                decision: Decision::Rejected,
                ..
            },
        ) => Ok(TransitionPlan {
            next: Rejected,
            vehicle_status: Some(VehicleStatus::Available),
        }),
        (current, event) => Err(AppError::InvalidTransition(format!(
            "Cannot {} an application in status '{}'",
            event.verb(),
            current
        ))),
    }
}

/// Resultado de aplicar un evento dentro de la transacción
#[derive(Debug, Clone)]
pub struct AppliedTransition {
    pub application: RentalApplication,
    pub vehicle_status: VehicleStatus,
    /// Ruta del comprobante reemplazado, a borrar tras el commit
    pub replaced_receipt_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RentalStats {
    pub total_applications: i64,
    pub pending_applications: i64,
    pub payment_received_applications: i64,
    pub approved_applications: i64,
    pub rejected_applications: i64,
    pub active_rentals: i64,
}
