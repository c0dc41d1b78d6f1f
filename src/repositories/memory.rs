//! Tienda en memoria
//!
//! Implementa todos los traits de repositorio sobre tablas protegidas por un
//! único mutex, de modo que cada operación es atómica igual que una
//! transacción. Respeta las mismas restricciones que el schema PostgreSQL
//! (unicidad, claves foráneas, borrados en cascada).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    DocumentRepository, DriverRepository, RentalRepository, UserRepository, VehicleRepository,
};
use crate::models::{
    document::{Document, DocumentOwner, NewDocument, VehicleDocumentRow},
    driver::{Driver, DriverChanges, DriverStats, DriverStatus, NewDriver},
    rental::{
        plan, AppliedTransition, NewRentalApplication, RentalApplication, RentalEvent,
        RentalFilters, RentalStats, RentalStatus, TransitionContext,
    },
    user::{NewUser, User},
    vehicle::{NewVehicle, Vehicle, VehicleChanges, VehiclePhoto, VehicleStats, VehicleStatus},
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    vehicles: Vec<Vehicle>,
    drivers: Vec<Driver>,
    documents: Vec<Document>,
    rentals: Vec<RentalApplication>,
}

impl Tables {
    fn vehicle_mut(&mut self, id: Uuid) -> AppResult<&mut Vehicle> {
        self.vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| not_found_error("Vehicle"))
    }

    fn user_mut(&mut self, id: Uuid) -> AppResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found_error("User"))
    }

    fn check_vehicle_unique(&self, id: Option<Uuid>, plate: &str, vin: &str) -> AppResult<()> {
        for other in self.vehicles.iter().filter(|v| Some(v.id) != id) {
            if other.license_plate == plate {
                return Err(conflict_error("Vehicle", "license_plate", plate));
            }
            if other.vin == vin {
                return Err(conflict_error("Vehicle", "vin", vin));
            }
        }
        Ok(())
    }

    fn check_driver_email(&self, id: Option<Uuid>, email: &str) -> AppResult<()> {
        if self
            .drivers
            .iter()
            .any(|d| Some(d.id) != id && d.email == email)
        {
            return Err(conflict_error("Driver", "email", email));
        }
        Ok(())
    }

    fn owner_exists(&self, owner: DocumentOwner) -> bool {
        match owner {
            DocumentOwner::Driver(id) => self.drivers.iter().any(|d| d.id == id),
            DocumentOwner::Vehicle(id) => self.vehicles.iter().any(|v| v.id == id),
        }
    }
}

fn belongs_to(document: &Document, owner: DocumentOwner) -> bool {
    document.driver_id == owner.driver_id() && document.vehicle_id == owner.vehicle_id()
}

/// Repositorios en memoria para tests y desarrollo sin base de datos
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(conflict_error("User", "email", &user.email));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_verified: user.is_verified,
            verification_token: user.verification_token,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let user = tables.user_mut(id)?;
        user.is_verified = true;
        user.verification_token = None;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_verification_token(&self, id: Uuid, token: &str) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let user = tables.user_mut(id)?;
        if user.is_verified {
            return Err(AppError::AlreadyVerified);
        }
        user.verification_token = Some(token.to_string());
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.lock().await;
        tables.check_vehicle_unique(None, &vehicle.license_plate, &vehicle.vin)?;

        let now = Utc::now();
        let record = Vehicle {
            id: Uuid::new_v4(),
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            license_plate: vehicle.license_plate,
            vin: vehicle.vin,
            bond_amount: vehicle.bond_amount,
            rent_per_week: vehicle.rent_per_week,
            current_mileage: vehicle.current_mileage,
            odo_meter: vehicle.odo_meter,
            next_service_date: vehicle.next_service_date,
            vehicle_type: vehicle.vehicle_type,
            color: vehicle.color,
            fuel_type: vehicle.fuel_type,
            transmission: vehicle.transmission,
            status: VehicleStatus::Available,
            owner_name: vehicle.owner_name,
            photo_url: None,
            photo_path: None,
            photo_name: None,
            photo_size: None,
            created_at: now,
            updated_at: now,
        };
        tables.vehicles.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.lock().await;
        Ok(tables.vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn list(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .vehicles
            .iter()
            .rev()
            .filter(|v| status.map_or(true, |s| v.status == s))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle> {
        let mut tables = self.tables.lock().await;

        let current = tables
            .vehicles
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle"))?;
        if changes.status.is_some() && current.status.is_lifecycle_managed() {
            return Err(AppError::Conflict(format!(
                "Vehicle status is managed by its rental while '{}'",
                current.status
            )));
        }
        let plate = changes
            .license_plate
            .clone()
            .unwrap_or_else(|| current.license_plate.clone());
        let vin = changes.vin.clone().unwrap_or_else(|| current.vin.clone());
        tables.check_vehicle_unique(Some(id), &plate, &vin)?;

        let vehicle = tables.vehicle_mut(id)?;
        vehicle.license_plate = plate;
        vehicle.vin = vin;
        if let Some(make) = changes.make {
            vehicle.make = make;
        }
        if let Some(model) = changes.model {
            vehicle.model = model;
        }
        if let Some(year) = changes.year {
            vehicle.year = year;
        }
        if let Some(bond_amount) = changes.bond_amount {
            vehicle.bond_amount = bond_amount;
        }
        if let Some(rent_per_week) = changes.rent_per_week {
            vehicle.rent_per_week = rent_per_week;
        }
        if let Some(current_mileage) = changes.current_mileage {
            vehicle.current_mileage = current_mileage;
        }
        if let Some(odo_meter) = changes.odo_meter {
            vehicle.odo_meter = odo_meter;
        }
        if let Some(next_service_date) = changes.next_service_date {
            vehicle.next_service_date = next_service_date;
        }
        if let Some(vehicle_type) = changes.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(color) = changes.color {
            vehicle.color = color;
        }
        if let Some(fuel_type) = changes.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        if let Some(transmission) = changes.transmission {
            vehicle.transmission = transmission;
        }
        if let Some(status) = changes.status {
            vehicle.status = status;
        }
        if changes.owner_name.is_some() {
            vehicle.owner_name = changes.owner_name;
        }
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    async fn set_photo(&self, id: Uuid, photo: VehiclePhoto) -> AppResult<(Vehicle, Option<String>)> {
        let mut tables = self.tables.lock().await;
        let vehicle = tables.vehicle_mut(id)?;
        let previous = vehicle.photo_path.replace(photo.path);
        vehicle.photo_url = Some(photo.url);
        vehicle.photo_name = Some(photo.name);
        vehicle.photo_size = Some(photo.size);
        vehicle.updated_at = Utc::now();
        Ok((vehicle.clone(), previous))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Vec<String>> {
        let mut tables = self.tables.lock().await;

        let vehicle = tables
            .vehicles
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle"))?;

        let open = tables
            .rentals
            .iter()
            .filter(|r| r.vehicle_id == id && r.status.is_open())
            .count();
        if open > 0 {
            return Err(AppError::Conflict(format!(
                "Vehicle has {} active rental application(s)",
                open
            )));
        }

        let mut orphaned: Vec<String> = tables
            .documents
            .iter()
            .filter(|d| d.vehicle_id == Some(id))
            .map(|d| d.file_path.clone())
            .collect();
        orphaned.extend(
            tables
                .rentals
                .iter()
                .filter(|r| r.vehicle_id == id)
                .filter_map(|r| r.payment_receipt_path.clone()),
        );
        orphaned.extend(vehicle.photo_path);

        tables.documents.retain(|d| d.vehicle_id != Some(id));
        tables.rentals.retain(|r| r.vehicle_id != id);
        tables.vehicles.retain(|v| v.id != id);
        for driver in tables.drivers.iter_mut() {
            if driver.selected_vehicle_id == Some(id) {
                driver.selected_vehicle_id = None;
            }
        }
        Ok(orphaned)
    }

    async fn stats(&self) -> AppResult<VehicleStats> {
        let tables = self.tables.lock().await;
        let count = |status: VehicleStatus| {
            tables.vehicles.iter().filter(|v| v.status == status).count() as i64
        };
        Ok(VehicleStats {
            total_vehicles: tables.vehicles.len() as i64,
            available_vehicles: count(VehicleStatus::Available),
            rented_vehicles: count(VehicleStatus::Rented),
            maintenance_vehicles: count(VehicleStatus::Maintenance),
            pending_approval_vehicles: count(VehicleStatus::PendingApproval),
            out_of_service_vehicles: count(VehicleStatus::OutOfService),
        })
    }
}

#[async_trait]
impl DriverRepository for InMemoryStore {
    async fn create(&self, driver: NewDriver) -> AppResult<Driver> {
        let mut tables = self.tables.lock().await;
        tables.check_driver_email(None, &driver.email)?;
        if let Some(vehicle_id) = driver.selected_vehicle_id {
            tables.vehicle_mut(vehicle_id)?;
        }

        let now = Utc::now();
        let record = Driver {
            id: Uuid::new_v4(),
            first_name: driver.first_name,
            last_name: driver.last_name,
            email: driver.email,
            phone: driver.phone,
            license_number: driver.license_number,
            license_expiry: driver.license_expiry,
            address: driver.address,
            emergency_contact: driver.emergency_contact,
            emergency_phone: driver.emergency_phone,
            selected_vehicle_id: driver.selected_vehicle_id,
            contract_start_date: None,
            contract_end_date: None,
            contract_period: driver.contract_period,
            bond_amount: driver.bond_amount,
            weekly_rent: driver.weekly_rent,
            contract_signed: false,
            payment_receipt_uploaded: false,
            payment_receipt_url: None,
            status: DriverStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.drivers.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let tables = self.tables.lock().await;
        Ok(tables.drivers.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self, status: Option<DriverStatus>) -> AppResult<Vec<Driver>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .drivers
            .iter()
            .rev()
            .filter(|d| status.map_or(true, |s| d.status == s))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: DriverChanges) -> AppResult<Driver> {
        let mut tables = self.tables.lock().await;
        if !tables.drivers.iter().any(|d| d.id == id) {
            return Err(not_found_error("Driver"));
        }
        if let Some(email) = &changes.email {
            tables.check_driver_email(Some(id), email)?;
        }
        if let Some(vehicle_id) = changes.selected_vehicle_id {
            tables.vehicle_mut(vehicle_id)?;
        }

        let driver = tables
            .drivers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found_error("Driver"))?;
        let DriverChanges {
            first_name,
            last_name,
            email,
            phone,
            license_number,
            license_expiry,
            address,
            emergency_contact,
            emergency_phone,
            selected_vehicle_id,
            status,
            contract,
            payment,
        } = changes;

        if let Some(v) = first_name {
            driver.first_name = v;
        }
        if let Some(v) = last_name {
            driver.last_name = v;
        }
        if let Some(v) = email {
            driver.email = v;
        }
        if let Some(v) = phone {
            driver.phone = v;
        }
        if let Some(v) = license_number {
            driver.license_number = v;
        }
        if let Some(v) = license_expiry {
            driver.license_expiry = v;
        }
        if let Some(v) = address {
            driver.address = v;
        }
        if let Some(v) = emergency_contact {
            driver.emergency_contact = v;
        }
        if let Some(v) = emergency_phone {
            driver.emergency_phone = v;
        }
        if selected_vehicle_id.is_some() {
            driver.selected_vehicle_id = selected_vehicle_id;
        }
        if let Some(v) = status {
            driver.status = v;
        }
        if contract.contract_start_date.is_some() {
            driver.contract_start_date = contract.contract_start_date;
        }
        if contract.contract_end_date.is_some() {
            driver.contract_end_date = contract.contract_end_date;
        }
        if contract.contract_period.is_some() {
            driver.contract_period = contract.contract_period;
        }
        if contract.bond_amount.is_some() {
            driver.bond_amount = contract.bond_amount;
        }
        if contract.weekly_rent.is_some() {
            driver.weekly_rent = contract.weekly_rent;
        }
        if let Some(v) = contract.contract_signed {
            driver.contract_signed = v;
        }
        if let Some(v) = payment.payment_receipt_uploaded {
            driver.payment_receipt_uploaded = v;
        }
        if payment.payment_receipt_url.is_some() {
            driver.payment_receipt_url = payment.payment_receipt_url;
        }
        driver.updated_at = Utc::now();
        Ok(driver.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<Vec<String>> {
        let mut tables = self.tables.lock().await;
        if !tables.drivers.iter().any(|d| d.id == id) {
            return Err(not_found_error("Driver"));
        }

        let paths = tables
            .documents
            .iter()
            .filter(|d| d.driver_id == Some(id))
            .map(|d| d.file_path.clone())
            .collect();
        tables.documents.retain(|d| d.driver_id != Some(id));
        tables.drivers.retain(|d| d.id != id);
        Ok(paths)
    }

    async fn stats(&self) -> AppResult<DriverStats> {
        let tables = self.tables.lock().await;
        let count =
            |status: DriverStatus| tables.drivers.iter().filter(|d| d.status == status).count() as i64;
        Ok(DriverStats {
            total_drivers: tables.drivers.len() as i64,
            active_drivers: count(DriverStatus::Active),
            pending_drivers: count(DriverStatus::Pending),
            suspended_drivers: count(DriverStatus::Suspended),
        })
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn create(&self, document: NewDocument) -> AppResult<Document> {
        let mut tables = self.tables.lock().await;
        if !tables.owner_exists(document.owner) {
            return Err(not_found_error(document.owner.entity()));
        }

        let record = Document {
            id: Uuid::new_v4(),
            driver_id: document.owner.driver_id(),
            vehicle_id: document.owner.vehicle_id(),
            document_type: document.document_type,
            file_name: document.file_name,
            file_path: document.file_path,
            file_url: document.file_url,
            file_size: document.file_size,
            expiry_date: document.expiry_date,
            uploaded_at: Utc::now(),
        };
        tables.documents.push(record.clone());
        Ok(record)
    }

    async fn list_for_owner(&self, owner: DocumentOwner) -> AppResult<Vec<Document>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .documents
            .iter()
            .rev()
            .filter(|d| belongs_to(d, owner))
            .cloned()
            .collect())
    }

    async fn find_for_owner(&self, owner: DocumentOwner, id: Uuid) -> AppResult<Option<Document>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.id == id && belongs_to(d, owner))
            .cloned())
    }

    async fn update_expiry(
        &self,
        owner: DocumentOwner,
        id: Uuid,
        expiry_date: Option<DateTime<Utc>>,
    ) -> AppResult<Document> {
        let mut tables = self.tables.lock().await;
        let document = tables
            .documents
            .iter_mut()
            .find(|d| d.id == id && belongs_to(d, owner))
            .ok_or_else(|| not_found_error("Document"))?;
        document.expiry_date = expiry_date;
        Ok(document.clone())
    }

    async fn delete(&self, owner: DocumentOwner, id: Uuid) -> AppResult<Document> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .documents
            .iter()
            .position(|d| d.id == id && belongs_to(d, owner))
            .ok_or_else(|| not_found_error("Document"))?;
        Ok(tables.documents.remove(index))
    }

    async fn vehicle_documents(&self) -> AppResult<Vec<VehicleDocumentRow>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .documents
            .iter()
            .filter_map(|d| {
                let vehicle_id = d.vehicle_id?;
                let vehicle = tables.vehicles.iter().find(|v| v.id == vehicle_id)?;
                Some(VehicleDocumentRow {
                    document_id: d.id,
                    vehicle_id,
                    document_type: d.document_type.clone(),
                    file_name: d.file_name.clone(),
                    expiry_date: d.expiry_date,
                    make: vehicle.make.clone(),
                    model: vehicle.model.clone(),
                    license_plate: vehicle.license_plate.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl RentalRepository for InMemoryStore {
    async fn create(&self, application: NewRentalApplication) -> AppResult<RentalApplication> {
        let mut tables = self.tables.lock().await;
        tables.vehicle_mut(application.vehicle_id)?;

        let now = Utc::now();
        let record = RentalApplication {
            id: Uuid::new_v4(),
            vehicle_id: application.vehicle_id,
            applicant_user_id: application.applicant_user_id,
            first_name: application.first_name,
            last_name: application.last_name,
            email: application.email,
            phone: application.phone,
            license_number: application.license_number,
            license_expiry: application.license_expiry,
            address: application.address,
            emergency_contact: application.emergency_contact,
            emergency_phone: application.emergency_phone,
            contract_period: application.contract_period,
            status: RentalStatus::Pending,
            admin_notes: None,
            processed_at: None,
            processed_by: None,
            payment_receipt_url: None,
            payment_receipt_path: None,
            submitted_at: now,
            updated_at: now,
        };
        tables.rentals.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RentalApplication>> {
        let tables = self.tables.lock().await;
        Ok(tables.rentals.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filters: RentalFilters) -> AppResult<Vec<RentalApplication>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .rentals
            .iter()
            .rev()
            .filter(|r| filters.status.map_or(true, |s| r.status == s))
            .filter(|r| filters.vehicle_id.map_or(true, |v| r.vehicle_id == v))
            .cloned()
            .collect())
    }

    async fn list_for_applicant(&self, user_id: Uuid) -> AppResult<Vec<RentalApplication>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .rentals
            .iter()
            .rev()
            .filter(|r| r.applicant_user_id == user_id)
            .cloned()
            .collect())
    }

    async fn apply(
        &self,
        id: Uuid,
        event: RentalEvent,
        now: DateTime<Utc>,
    ) -> AppResult<AppliedTransition> {
        let mut tables = self.tables.lock().await;

        let application = tables
            .rentals
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Rental application"))?;
        let vehicle_status = tables.vehicle_mut(application.vehicle_id)?.status;
        let held_by_other = tables.rentals.iter().any(|r| {
            r.vehicle_id == application.vehicle_id && r.id != id && r.status.holds_vehicle()
        });

        let context = TransitionContext {
            current: application.status,
            vehicle_status,
            held_by_other,
        };
        let plan = plan(&context, &event)?;

        let record = tables
            .rentals
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found_error("Rental application"))?;
        record.status = plan.next;
        record.updated_at = now;
        let replaced_receipt_path = match event {
            RentalEvent::PaymentReceipt { url, path } => {
                record.payment_receipt_url = Some(url);
                record.payment_receipt_path.replace(path)
            }
            RentalEvent::Decide {
                notes,
                processed_by,
                ..
            } => {
                record.admin_notes = notes;
                record.processed_by = Some(processed_by);
                record.processed_at = Some(now);
                None
            }
        };
        let updated = record.clone();

        if let Some(next_vehicle_status) = plan.vehicle_status {
            let vehicle = tables.vehicle_mut(updated.vehicle_id)?;
            vehicle.status = next_vehicle_status;
            vehicle.updated_at = now;
        }

        Ok(AppliedTransition {
            application: updated,
            vehicle_status: plan.vehicle_status.unwrap_or(vehicle_status),
            replaced_receipt_path,
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<RentalApplication> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .rentals
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found_error("Rental application"))?;
        let holds_vehicle = tables.rentals[index].status.holds_vehicle();
        let vehicle_id = tables.rentals[index].vehicle_id;
        let vehicle = tables.vehicle_mut(vehicle_id)?;
        if holds_vehicle && vehicle.status.is_lifecycle_managed() {
            vehicle.status = VehicleStatus::Available;
            vehicle.updated_at = Utc::now();
        }
        Ok(tables.rentals.remove(index))
    }

    async fn stats(&self) -> AppResult<RentalStats> {
        let tables = self.tables.lock().await;
        let count =
            |status: RentalStatus| tables.rentals.iter().filter(|r| r.status == status).count() as i64;
        let approved = count(RentalStatus::Approved);
        Ok(RentalStats {
            total_applications: tables.rentals.len() as i64,
            pending_applications: count(RentalStatus::Pending),
            payment_received_applications: count(RentalStatus::PaymentReceived),
            approved_applications: approved,
            rejected_applications: count(RentalStatus::Rejected),
            active_rentals: approved,
        })
    }
}
