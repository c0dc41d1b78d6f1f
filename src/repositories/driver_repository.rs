use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::DriverRepository;
use crate::models::driver::{Driver, DriverChanges, DriverStats, DriverStatus, NewDriver};
use crate::utils::errors::{map_db_error, not_found_error, AppResult};

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn create(&self, driver: NewDriver) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                id, first_name, last_name, email, phone, license_number, license_expiry,
                address, emergency_contact, emergency_phone, selected_vehicle_id,
                contract_period, bond_amount, weekly_rent, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(driver.first_name)
        .bind(driver.last_name)
        .bind(driver.email)
        .bind(driver.phone)
        .bind(driver.license_number)
        .bind(driver.license_expiry)
        .bind(driver.address)
        .bind(driver.emergency_contact)
        .bind(driver.emergency_phone)
        .bind(driver.selected_vehicle_id)
        .bind(driver.contract_period)
        .bind(driver.bond_amount)
        .bind(driver.weekly_rent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Driver", "Vehicle"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    async fn list(&self, status: Option<DriverStatus>) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT * FROM drivers
            WHERE ($1::driver_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn update(&self, id: Uuid, changes: DriverChanges) -> AppResult<Driver> {
        let DriverChanges {
            contract, payment, ..
        } = &changes;

        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                license_number = COALESCE($6, license_number),
                license_expiry = COALESCE($7, license_expiry),
                address = COALESCE($8, address),
                emergency_contact = COALESCE($9, emergency_contact),
                emergency_phone = COALESCE($10, emergency_phone),
                selected_vehicle_id = COALESCE($11, selected_vehicle_id),
                status = COALESCE($12, status),
                contract_start_date = COALESCE($13, contract_start_date),
                contract_end_date = COALESCE($14, contract_end_date),
                contract_period = COALESCE($15, contract_period),
                bond_amount = COALESCE($16, bond_amount),
                weekly_rent = COALESCE($17, weekly_rent),
                contract_signed = COALESCE($18, contract_signed),
                payment_receipt_uploaded = COALESCE($19, payment_receipt_uploaded),
                payment_receipt_url = COALESCE($20, payment_receipt_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.license_number)
        .bind(changes.license_expiry)
        .bind(&changes.address)
        .bind(&changes.emergency_contact)
        .bind(&changes.emergency_phone)
        .bind(changes.selected_vehicle_id)
        .bind(changes.status)
        .bind(contract.contract_start_date)
        .bind(contract.contract_end_date)
        .bind(&contract.contract_period)
        .bind(contract.bond_amount)
        .bind(contract.weekly_rent)
        .bind(contract.contract_signed)
        .bind(payment.payment_receipt_uploaded)
        .bind(&payment.payment_receipt_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Driver", "Vehicle"))?
        .ok_or_else(|| not_found_error("Driver"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        // El bloqueo del conductor frena documentos nuevos hasta el commit
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM drivers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(not_found_error("Driver"));
        }

        let paths: Vec<(String,)> =
            sqlx::query_as("DELETE FROM documents WHERE driver_id = $1 RETURNING file_path")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(paths.into_iter().map(|(path,)| path).collect())
    }

    async fn stats(&self) -> AppResult<DriverStats> {
        let (total, active, pending, suspended): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'active'),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'suspended')
            FROM drivers
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DriverStats {
            total_drivers: total,
            active_drivers: active,
            pending_drivers: pending,
            suspended_drivers: suspended,
        })
    }
}
