use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::RentalRepository;
use crate::models::rental::{
    plan, AppliedTransition, NewRentalApplication, RentalApplication, RentalEvent, RentalFilters,
    RentalStats, TransitionContext,
};
use crate::models::vehicle::VehicleStatus;
use crate::utils::errors::{is_unique_violation, map_db_error, not_found_error, AppError, AppResult};

pub struct PgRentalRepository {
    pool: PgPool,
}

impl PgRentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bloquea la solicitud y después su vehículo
    async fn lock_application_and_vehicle(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<(RentalApplication, VehicleStatus)> {
        let application = sqlx::query_as::<_, RentalApplication>(
            "SELECT * FROM rental_applications WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| not_found_error("Rental application"))?;

        let (vehicle_status,): (VehicleStatus,) =
            sqlx::query_as("SELECT status FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(application.vehicle_id)
                .fetch_one(&mut **tx)
                .await?;

        Ok((application, vehicle_status))
    }
}

#[async_trait]
impl RentalRepository for PgRentalRepository {
    async fn create(&self, application: NewRentalApplication) -> AppResult<RentalApplication> {
        sqlx::query_as::<_, RentalApplication>(
            r#"
            INSERT INTO rental_applications (
                id, vehicle_id, applicant_user_id, first_name, last_name, email, phone,
                license_number, license_expiry, address, emergency_contact, emergency_phone,
                contract_period, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application.vehicle_id)
        .bind(application.applicant_user_id)
        .bind(application.first_name)
        .bind(application.last_name)
        .bind(application.email)
        .bind(application.phone)
        .bind(application.license_number)
        .bind(application.license_expiry)
        .bind(application.address)
        .bind(application.emergency_contact)
        .bind(application.emergency_phone)
        .bind(application.contract_period)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Rental application", "Vehicle"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RentalApplication>> {
        let application = sqlx::query_as::<_, RentalApplication>(
            "SELECT * FROM rental_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    async fn list(&self, filters: RentalFilters) -> AppResult<Vec<RentalApplication>> {
        let applications = sqlx::query_as::<_, RentalApplication>(
            r#"
            SELECT * FROM rental_applications
            WHERE ($1::rental_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vehicle_id = $2)
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(filters.status)
        .bind(filters.vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn list_for_applicant(&self, user_id: Uuid) -> AppResult<Vec<RentalApplication>> {
        let applications = sqlx::query_as::<_, RentalApplication>(
            "SELECT * FROM rental_applications WHERE applicant_user_id = $1 ORDER BY submitted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn apply(
        &self,
        id: Uuid,
        event: RentalEvent,
        now: DateTime<Utc>,
    ) -> AppResult<AppliedTransition> {
        let mut tx = self.pool.begin().await?;

        let (application, vehicle_status) = Self::lock_application_and_vehicle(&mut tx, id).await?;

        let (held_by_other,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM rental_applications
                WHERE vehicle_id = $1 AND id <> $2 AND status IN ('payment_received', 'approved')
            )
            "#,
        )
        .bind(application.vehicle_id)
        .bind(application.id)
        .fetch_one(&mut *tx)
        .await?;

        let context = TransitionContext {
            current: application.status,
            vehicle_status,
            held_by_other,
        };
        let plan = plan(&context, &event)?;
        debug!(
            "Rental {} {} -> {} (vehicle {:?})",
            id, application.status, plan.next, plan.vehicle_status
        );

        let (updated, replaced_receipt_path) = match event {
            RentalEvent::PaymentReceipt { url, path } => {
                let updated = sqlx::query_as::<_, RentalApplication>(
                    r#"
                    UPDATE rental_applications
                    SET status = $2, payment_receipt_url = $3, payment_receipt_path = $4, updated_at = $5
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(plan.next)
                .bind(url)
                .bind(path)
                .bind(now)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::VehicleUnavailable(
                            "Vehicle is already reserved by another application".to_string(),
                        )
                    } else {
                        AppError::Database(e)
                    }
                })?;
                (updated, application.payment_receipt_path)
            }
            RentalEvent::Decide {
                notes,
                processed_by,
                ..
            } => {
                let updated = sqlx::query_as::<_, RentalApplication>(
                    r#"
                    UPDATE rental_applications
                    SET status = $2, admin_notes = $3, processed_by = $4,
                        processed_at = $5, updated_at = $5
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(plan.next)
                .bind(notes)
                .bind(processed_by)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                (updated, None)
            }
        };

        if let Some(next_vehicle_status) = plan.vehicle_status {
            sqlx::query("UPDATE vehicles SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(updated.vehicle_id)
                .bind(next_vehicle_status)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(AppliedTransition {
            application: updated,
            vehicle_status: plan.vehicle_status.unwrap_or(vehicle_status),
            replaced_receipt_path,
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<RentalApplication> {
        let mut tx = self.pool.begin().await?;

        let (application, vehicle_status) = Self::lock_application_and_vehicle(&mut tx, id).await?;

        if application.status.holds_vehicle() && vehicle_status.is_lifecycle_managed() {
            sqlx::query(
                "UPDATE vehicles SET status = 'available', updated_at = NOW() WHERE id = $1",
            )
            .bind(application.vehicle_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM rental_applications WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(application)
    }

    async fn stats(&self) -> AppResult<RentalStats> {
        let (total, pending, payment_received, approved, rejected): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'pending'),
                    COUNT(*) FILTER (WHERE status = 'payment_received'),
                    COUNT(*) FILTER (WHERE status = 'approved'),
                    COUNT(*) FILTER (WHERE status = 'rejected')
                FROM rental_applications
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(RentalStats {
            total_applications: total,
            pending_applications: pending,
            payment_received_applications: payment_received,
            approved_applications: approved,
            rejected_applications: rejected,
            active_rentals: approved,
        })
    }
}
