use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::VehicleRepository;
use crate::models::rental::RentalStatus;
use crate::models::vehicle::{
    NewVehicle, Vehicle, VehicleChanges, VehiclePhoto, VehicleStats, VehicleStatus,
};
use crate::utils::errors::{map_db_error, not_found_error, AppError, AppResult};

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, make, model, year, license_plate, vin, bond_amount, rent_per_week,
                current_mileage, odo_meter, next_service_date, vehicle_type, color,
                fuel_type, transmission, status, owner_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 'available', $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle.make)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.license_plate)
        .bind(vehicle.vin)
        .bind(vehicle.bond_amount)
        .bind(vehicle.rent_per_week)
        .bind(vehicle.current_mileage)
        .bind(vehicle.odo_meter)
        .bind(vehicle.next_service_date)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.color)
        .bind(vehicle.fuel_type)
        .bind(vehicle.transmission)
        .bind(vehicle.owner_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Vehicle", "Vehicle"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::vehicle_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle> {
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET make = COALESCE($2, make),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                license_plate = COALESCE($5, license_plate),
                vin = COALESCE($6, vin),
                bond_amount = COALESCE($7, bond_amount),
                rent_per_week = COALESCE($8, rent_per_week),
                current_mileage = COALESCE($9, current_mileage),
                odo_meter = COALESCE($10, odo_meter),
                next_service_date = COALESCE($11, next_service_date),
                vehicle_type = COALESCE($12, vehicle_type),
                color = COALESCE($13, color),
                fuel_type = COALESCE($14, fuel_type),
                transmission = COALESCE($15, transmission),
                status = COALESCE($16, status),
                owner_name = COALESCE($17, owner_name),
                updated_at = NOW()
            WHERE id = $1
              AND ($16::vehicle_status IS NULL OR status NOT IN ('rented', 'pending_approval'))
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.make)
        .bind(changes.model)
        .bind(changes.year)
        .bind(changes.license_plate)
        .bind(changes.vin)
        .bind(changes.bond_amount)
        .bind(changes.rent_per_week)
        .bind(changes.current_mileage)
        .bind(changes.odo_meter)
        .bind(changes.next_service_date)
        .bind(changes.vehicle_type)
        .bind(changes.color)
        .bind(changes.fuel_type)
        .bind(changes.transmission)
        .bind(changes.status)
        .bind(changes.owner_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Vehicle", "Vehicle"))?;

        match updated {
            Some(vehicle) => Ok(vehicle),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(AppError::Conflict(format!(
                    "Vehicle status is managed by its rental while '{}'",
                    current.status
                ))),
                None => Err(not_found_error("Vehicle")),
            },
        }
    }

    async fn set_photo(&self, id: Uuid, photo: VehiclePhoto) -> AppResult<(Vehicle, Option<String>)> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<(Option<String>,)> =
            sqlx::query_as("SELECT photo_path FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (previous_path,) = previous.ok_or_else(|| not_found_error("Vehicle"))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET photo_url = $2, photo_path = $3, photo_name = $4, photo_size = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(photo.url)
        .bind(photo.path)
        .bind(photo.name)
        .bind(photo.size)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((vehicle, previous_path))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        // Solicitudes antes que el vehículo, igual que el ciclo de vida
        sqlx::query("SELECT id FROM rental_applications WHERE vehicle_id = $1 FOR UPDATE")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        // Con el vehículo bloqueado no entran solicitudes ni documentos nuevos;
        // se relee para ver las que se confirmaron antes del bloqueo
        let applications: Vec<(RentalStatus,)> = sqlx::query_as(
            "SELECT status FROM rental_applications WHERE vehicle_id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let open = applications.iter().filter(|(status,)| status.is_open()).count();
        if open > 0 {
            return Err(AppError::Conflict(format!(
                "Vehicle has {} active rental application(s)",
                open
            )));
        }

        let receipt_paths: Vec<(Option<String>,)> = sqlx::query_as(
            "DELETE FROM rental_applications WHERE vehicle_id = $1 AND status = 'rejected' RETURNING payment_receipt_path",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        let document_paths: Vec<(String,)> =
            sqlx::query_as("DELETE FROM documents WHERE vehicle_id = $1 RETURNING file_path")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut orphaned: Vec<String> = document_paths.into_iter().map(|(path,)| path).collect();
        orphaned.extend(receipt_paths.into_iter().filter_map(|(path,)| path));
        orphaned.extend(vehicle.photo_path);
        Ok(orphaned)
    }

    async fn stats(&self) -> AppResult<VehicleStats> {
        let (total, available, rented, maintenance, pending_approval, out_of_service): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'available'),
                COUNT(*) FILTER (WHERE status = 'rented'),
                COUNT(*) FILTER (WHERE status = 'maintenance'),
                COUNT(*) FILTER (WHERE status = 'pending_approval'),
                COUNT(*) FILTER (WHERE status = 'out_of_service')
            FROM vehicles
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(VehicleStats {
            total_vehicles: total,
            available_vehicles: available,
            rented_vehicles: rented,
            maintenance_vehicles: maintenance,
            pending_approval_vehicles: pending_approval,
            out_of_service_vehicles: out_of_service,
        })
    }
}
