//! Modelo de Document
//!
//! Documentos subidos para un conductor o para un vehículo. Cada documento
//! pertenece exactamente a uno de los dos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catálogo de tipos de documento expuesto en `GET /document-types`
pub const DOCUMENT_TYPES: &[&str] = &[
    "Car Contract",
    "Red Book Inspection Report",
    "Car Registration",
    "Car Insurance",
    "CPV Registration",
    "Driver License",
    "Insurance Certificate",
    "Registration Certificate",
];

/// Propietario de un documento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOwner {
    Driver(Uuid),
    Vehicle(Uuid),
}

impl DocumentOwner {
    pub fn driver_id(&self) -> Option<Uuid> {
        match self {
            DocumentOwner::Driver(id) => Some(*id),
            DocumentOwner::Vehicle(_) => None,
        }
    }

    pub fn vehicle_id(&self) -> Option<Uuid> {
        match self {
            DocumentOwner::Vehicle(id) => Some(*id),
            DocumentOwner::Driver(_) => None,
        }
    }

    /// Nombre de la entidad propietaria para mensajes de error
    pub fn entity(&self) -> &'static str {
        match self {
            DocumentOwner::Driver(_) => "Driver",
            DocumentOwner::Vehicle(_) => "Vehicle",
        }
    }
}

/// Document - mapea exactamente a la tabla documents
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub document_type: String,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_url: String,
    pub file_size: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    pub fn owner(&self) -> Option<DocumentOwner> {
        match (self.driver_id, self.vehicle_id) {
            (Some(id), None) => Some(DocumentOwner::Driver(id)),
            (None, Some(id)) => Some(DocumentOwner::Vehicle(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner: DocumentOwner,
    pub document_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_url: String,
    pub file_size: i64,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Documento de vehículo junto con los datos del vehículo para alertas
#[derive(Debug, Clone, FromRow)]
pub struct VehicleDocumentRow {
    pub document_id: Uuid,
    pub vehicle_id: Uuid,
    pub document_type: String,
    pub file_name: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub make: String,
    pub model: String,
    pub license_plate: String,
}

impl VehicleDocumentRow {
    pub fn vehicle_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.license_plate)
    }
}
