//! Repositorios de persistencia
//!
//! Cada entidad expone un trait async; los controladores solo conocen el
//! trait. `Repositories::postgres` conecta las implementaciones SQLx y
//! `Repositories::in_memory` una única tienda en memoria para tests.

pub mod document_repository;
pub mod driver_repository;
pub mod memory;
pub mod rental_repository;
pub mod user_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    document::{Document, DocumentOwner, NewDocument, VehicleDocumentRow},
    driver::{Driver, DriverChanges, DriverStats, DriverStatus, NewDriver},
    rental::{
        AppliedTransition, NewRentalApplication, RentalApplication, RentalEvent, RentalFilters,
        RentalStats,
    },
    user::{NewUser, User},
    vehicle::{NewVehicle, Vehicle, VehicleChanges, VehiclePhoto, VehicleStats, VehicleStatus},
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `Conflict` si el email ya existe
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>>;
    /// Marca el email como verificado y borra el token
    async fn mark_verified(&self, id: Uuid) -> AppResult<User>;
    async fn set_verification_token(&self, id: Uuid, token: &str) -> AppResult<User>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn list(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>>;
    /// Actualización parcial. Un cambio de estado solo se aplica si el
    /// vehículo no está `rented` ni `pending_approval`.
    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle>;
    /// Reemplaza la foto y devuelve la ruta de la anterior
    async fn set_photo(&self, id: Uuid, photo: VehiclePhoto) -> AppResult<(Vehicle, Option<String>)>;
    /// Borra el vehículo con sus documentos y solicitudes rechazadas.
    /// Devuelve las rutas de archivos que quedaron huérfanos.
    async fn delete(&self, id: Uuid) -> AppResult<Vec<String>>;
    async fn stats(&self) -> AppResult<VehicleStats>;
}

#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn create(&self, driver: NewDriver) -> AppResult<Driver>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>>;
    async fn list(&self, status: Option<DriverStatus>) -> AppResult<Vec<Driver>>;
    async fn update(&self, id: Uuid, changes: DriverChanges) -> AppResult<Driver>;
    /// Borra el conductor y sus documentos; devuelve las rutas de archivo
    async fn delete(&self, id: Uuid) -> AppResult<Vec<String>>;
    async fn stats(&self) -> AppResult<DriverStats>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// `NotFound` del propietario si no existe
    async fn create(&self, document: NewDocument) -> AppResult<Document>;
    async fn list_for_owner(&self, owner: DocumentOwner) -> AppResult<Vec<Document>>;
    async fn find_for_owner(&self, owner: DocumentOwner, id: Uuid) -> AppResult<Option<Document>>;
    async fn update_expiry(
        &self,
        owner: DocumentOwner,
        id: Uuid,
        expiry_date: Option<DateTime<Utc>>,
    ) -> AppResult<Document>;
    /// Borra un documento del propietario indicado y lo devuelve
    async fn delete(&self, owner: DocumentOwner, id: Uuid) -> AppResult<Document>;
    /// Todos los documentos de vehículos, con los datos del vehículo
    async fn vehicle_documents(&self) -> AppResult<Vec<VehicleDocumentRow>>;
}

#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// `NotFound` si el vehículo no existe
    async fn create(&self, application: NewRentalApplication) -> AppResult<RentalApplication>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RentalApplication>>;
    async fn list(&self, filters: RentalFilters) -> AppResult<Vec<RentalApplication>>;
    async fn list_for_applicant(&self, user_id: Uuid) -> AppResult<Vec<RentalApplication>>;
    /// Aplica un evento del ciclo de vida de forma atómica sobre la
    /// solicitud y su vehículo
    async fn apply(
        &self,
        id: Uuid,
        event: RentalEvent,
        now: DateTime<Utc>,
    ) -> AppResult<AppliedTransition>;
    /// Borra la solicitud; si reservaba el vehículo, lo libera
    async fn delete(&self, id: Uuid) -> AppResult<RentalApplication>;
    async fn stats(&self) -> AppResult<RentalStats>;
}

/// Conjunto de repositorios inyectado en `AppState`
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub drivers: Arc<dyn DriverRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub rentals: Arc<dyn RentalRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(user_repository::PgUserRepository::new(pool.clone())),
            vehicles: Arc::new(vehicle_repository::PgVehicleRepository::new(pool.clone())),
            drivers: Arc::new(driver_repository::PgDriverRepository::new(pool.clone())),
            documents: Arc::new(document_repository::PgDocumentRepository::new(pool.clone())),
            rentals: Arc::new(rental_repository::PgRentalRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(memory::InMemoryStore::new());
        Self {
            users: store.clone(),
            vehicles: store.clone(),
            drivers: store.clone(),
            documents: store.clone(),
            rentals: store,
        }
    }
}
