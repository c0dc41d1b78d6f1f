use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery};
use crate::dto::ApiResponse;
use crate::models::vehicle::{Vehicle, VehiclePhoto, VehicleStats};
use crate::repositories::VehicleRepository;
use crate::services::file_service::{delete_all, FileCategory, FileStorage};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::multipart::MultipartForm;

pub struct VehicleController {
    repository: Arc<dyn VehicleRepository>,
    storage: Arc<dyn FileStorage>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repositories.vehicles.clone(),
            storage: state.storage.clone(),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;

        let vehicle = self.repository.create(request.into_new_vehicle()?).await?;
        info!("🚗 Vehicle created: {}", vehicle.display_name());

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created successfully",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))
    }

    pub async fn list(&self, query: VehicleListQuery) -> AppResult<Vec<Vehicle>> {
        self.repository.list(query.status).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;

        let vehicle = self.repository.update(id, request.into_changes()?).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle updated successfully",
        ))
    }

    /// Sustituye la foto; la anterior se borra del disco tras guardar la nueva
    pub async fn upload_photo(
        &self,
        id: Uuid,
        mut form: MultipartForm,
    ) -> AppResult<ApiResponse<Vehicle>> {
        self.get_by_id(id).await?;
        let upload = form.require_file()?;

        let stored = self.storage.save(upload, FileCategory::VehiclePhoto).await?;
        let photo = VehiclePhoto {
            url: stored.url.clone(),
            path: stored.path.clone(),
            name: stored.file_name.clone(),
            size: stored.size,
        };

        let (vehicle, previous) = match self.repository.set_photo(id, photo).await {
            Ok(result) => result,
            Err(e) => {
                self.storage.delete(&stored.path).await;
                return Err(e);
            }
        };
        if let Some(previous) = previous {
            self.storage.delete(&previous).await;
        }

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle photo uploaded successfully",
        ))
    }

    /// Borra el vehículo; los archivos huérfanos se eliminan tras el commit
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let orphaned = self.repository.delete(id).await?;
        delete_all(self.storage.as_ref(), &orphaned).await;
        info!("🗑️  Vehicle {} deleted ({} files removed)", id, orphaned.len());
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<VehicleStats> {
        self.repository.stats().await
    }
}
