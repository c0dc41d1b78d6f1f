//! Solicitudes de alquiler
//!
//! Orquesta archivo y transición: el comprobante se guarda antes de aplicar
//! el evento, se borra si la transición falla y el comprobante reemplazado
//! se borra solo después del commit.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::rental_dto::{CreateRentalRequest, DecisionRequest, RentalTransitionResponse};
use crate::dto::ApiResponse;
use crate::models::rental::{Decision, RentalApplication, RentalEvent, RentalFilters, RentalStats};
use crate::models::user::User;
use crate::repositories::RentalRepository;
use crate::services::file_service::{FileCategory, FileStorage};
use crate::state::AppState;
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};
use crate::utils::multipart::MultipartForm;

pub struct RentalController {
    repository: Arc<dyn RentalRepository>,
    storage: Arc<dyn FileStorage>,
}

impl RentalController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repositories.rentals.clone(),
            storage: state.storage.clone(),
        }
    }

    pub async fn submit(
        &self,
        applicant: &User,
        request: CreateRentalRequest,
    ) -> AppResult<ApiResponse<RentalApplication>> {
        request.validate()?;

        let application = self
            .repository
            .create(request.into_application(applicant.id)?)
            .await?;
        info!(
            "📝 Rental application {} submitted for vehicle {}",
            application.id, application.vehicle_id
        );

        Ok(ApiResponse::success_with_message(
            application,
            "Rental application submitted successfully",
        ))
    }

    pub async fn list(&self, filters: RentalFilters) -> AppResult<Vec<RentalApplication>> {
        self.repository.list(filters).await
    }

    pub async fn list_mine(&self, user: &User) -> AppResult<Vec<RentalApplication>> {
        self.repository.list_for_applicant(user.id).await
    }

    /// Solicitud visible para su autor y para los admins
    pub async fn get_for(&self, user: &User, id: Uuid) -> AppResult<RentalApplication> {
        let application = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rental application"))?;

        if !user.is_admin() && application.applicant_user_id != user.id {
            return Err(forbidden_error(
                "access rental application",
                "it belongs to another user",
            ));
        }
        Ok(application)
    }

    pub async fn attach_payment_receipt(
        &self,
        user: &User,
        id: Uuid,
        mut form: MultipartForm,
    ) -> AppResult<ApiResponse<RentalTransitionResponse>> {
        self.get_for(user, id).await?;
        let upload = form.require_file()?;

        let stored = self.storage.save(upload, FileCategory::PaymentReceipt).await?;
        let event = RentalEvent::PaymentReceipt {
            url: stored.url.clone(),
            path: stored.path.clone(),
        };

        let applied = match self.repository.apply(id, event, Utc::now()).await {
            Ok(applied) => applied,
            Err(e) => {
                self.storage.delete(&stored.path).await;
                return Err(e);
            }
        };
        if let Some(replaced) = applied.replaced_receipt_path.as_deref() {
            self.storage.delete(replaced).await;
        }
        info!("💳 Payment receipt attached to application {}", id);

        Ok(ApiResponse::success_with_message(
            applied.into(),
            "Payment receipt uploaded successfully",
        ))
    }

    pub async fn decide(
        &self,
        admin: &User,
        id: Uuid,
        request: DecisionRequest,
    ) -> AppResult<ApiResponse<RentalTransitionResponse>> {
        let decision: Decision = request.status.trim().parse()?;
        let event = RentalEvent::Decide {
            decision,
            notes: request.admin_notes.filter(|notes| !notes.trim().is_empty()),
            processed_by: admin.email.clone(),
        };

        let applied = self.repository.apply(id, event, Utc::now()).await?;
        info!(
            "⚖️  Application {} {} by {}",
            id, applied.application.status, admin.email
        );

        Ok(ApiResponse::success_with_message(
            applied.into(),
            format!("Application {}", request.status.trim()),
        ))
    }

    /// Borra la solicitud y, tras el commit, su comprobante
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let application = self.repository.delete(id).await?;
        if let Some(path) = application.payment_receipt_path.as_deref() {
            self.storage.delete(path).await;
        }
        info!("🗑️  Rental application {} deleted", id);
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<RentalStats> {
        self.repository.stats().await
    }
}
