use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::{
    ContractUpdateRequest, CreateDriverRequest, DriverListQuery, PaymentUpdateRequest,
    UpdateDriverRequest,
};
use crate::dto::ApiResponse;
use crate::models::driver::{Driver, DriverStats};
use crate::repositories::DriverRepository;
use crate::services::file_service::{delete_all, FileStorage};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct DriverController {
    repository: Arc<dyn DriverRepository>,
    storage: Arc<dyn FileStorage>,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repositories.drivers.clone(),
            storage: state.storage.clone(),
        }
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;

        let driver = self.repository.create(request.into_new_driver()?).await?;
        info!("🧑 Driver created: {} {}", driver.first_name, driver.last_name);

        Ok(ApiResponse::success_with_message(
            driver,
            "Driver created successfully",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Driver> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))
    }

    pub async fn list(&self, query: DriverListQuery) -> AppResult<Vec<Driver>> {
        self.repository.list(query.status).await
    }

    pub async fn update(&self, id: Uuid, request: UpdateDriverRequest) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;

        let driver = self.repository.update(id, request.into_changes()?).await?;
        Ok(ApiResponse::success_with_message(
            driver,
            "Driver updated successfully",
        ))
    }

    pub async fn update_contract(
        &self,
        id: Uuid,
        request: ContractUpdateRequest,
    ) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;

        let driver = self.repository.update(id, request.into_changes()?).await?;
        Ok(ApiResponse::success_with_message(
            driver,
            "Contract updated successfully",
        ))
    }

    pub async fn update_payment(
        &self,
        id: Uuid,
        request: PaymentUpdateRequest,
    ) -> AppResult<ApiResponse<Driver>> {
        let driver = self.repository.update(id, request.into_changes()).await?;
        Ok(ApiResponse::success_with_message(
            driver,
            "Payment status updated successfully",
        ))
    }

    /// Borra el conductor con sus documentos y después sus archivos
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let orphaned = self.repository.delete(id).await?;
        delete_all(self.storage.as_ref(), &orphaned).await;
        info!("🗑️  Driver {} deleted ({} files removed)", id, orphaned.len());
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<DriverStats> {
        self.repository.stats().await
    }
}
