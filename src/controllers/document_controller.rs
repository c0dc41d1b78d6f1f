//! Documentos de conductores y vehículos
//!
//! Lo comparten las rutas `/drivers/:id/documents` y `/vehicles/:id/documents`.

use axum::body::Bytes;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::dto::document_dto::UpdateExpiryRequest;
use crate::models::document::{Document, DocumentOwner, NewDocument};
use crate::repositories::{DocumentRepository, DriverRepository, VehicleRepository};
use crate::services::file_service::{FileCategory, FileStorage};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::multipart::MultipartForm;
use crate::utils::validation::parse_optional_date_field;

pub struct DocumentController {
    documents: Arc<dyn DocumentRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    drivers: Arc<dyn DriverRepository>,
    storage: Arc<dyn FileStorage>,
}

impl DocumentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            documents: state.repositories.documents.clone(),
            vehicles: state.repositories.vehicles.clone(),
            drivers: state.repositories.drivers.clone(),
            storage: state.storage.clone(),
        }
    }

    async fn ensure_owner(&self, owner: DocumentOwner) -> AppResult<()> {
        let exists = match owner {
            DocumentOwner::Driver(id) => self.drivers.find_by_id(id).await?.is_some(),
            DocumentOwner::Vehicle(id) => self.vehicles.find_by_id(id).await?.is_some(),
        };
        if !exists {
            return Err(not_found_error(owner.entity()));
        }
        Ok(())
    }

    /// Guarda el archivo y crea el registro; si el registro falla, el
    /// archivo se borra
    pub async fn upload(&self, owner: DocumentOwner, mut form: MultipartForm) -> AppResult<Document> {
        self.ensure_owner(owner).await?;

        let document_type = form
            .text("document_type")
            .map(str::to_string)
            .ok_or_else(|| validation_error("document_type", "Document type is required"))?;
        let expiry_date = parse_optional_date_field("expiry_date", form.text("expiry_date"))?;
        let upload = form.require_file()?;

        let stored = self.storage.save(upload, FileCategory::Document).await?;
        let result = self
            .documents
            .create(NewDocument {
                owner,
                document_type,
                file_name: stored.file_name.clone(),
                file_path: stored.path.clone(),
                file_url: stored.url.clone(),
                file_size: stored.size,
                expiry_date,
            })
            .await;

        match result {
            Ok(document) => {
                info!("📄 {} document '{}' uploaded", owner.entity(), document.document_type);
                Ok(document)
            }
            Err(e) => {
                self.storage.delete(&stored.path).await;
                Err(e)
            }
        }
    }

    pub async fn list(&self, owner: DocumentOwner) -> AppResult<Vec<Document>> {
        self.ensure_owner(owner).await?;
        self.documents.list_for_owner(owner).await
    }

    pub async fn update_expiry(
        &self,
        owner: DocumentOwner,
        document_id: Uuid,
        request: UpdateExpiryRequest,
    ) -> AppResult<Document> {
        let expiry_date = request.parse()?;
        self.documents.update_expiry(owner, document_id, expiry_date).await
    }

    /// Documento de un conductor junto con su contenido
    ///
    /// Solo disponible cuando el conductor ya subió su comprobante de pago.
    pub async fn download(&self, driver_id: Uuid, document_id: Uuid) -> AppResult<(Document, Bytes)> {
        let driver = self
            .drivers
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))?;
        let document = self
            .documents
            .find_for_owner(DocumentOwner::Driver(driver_id), document_id)
            .await?
            .ok_or_else(|| not_found_error("Document"))?;

        if !driver.payment_receipt_uploaded {
            return Err(AppError::Forbidden(
                "Payment required to access documents".to_string(),
            ));
        }

        let contents = self.storage.read(&document.file_path).await?;
        Ok((document, contents))
    }

    /// Borra el registro y después el archivo
    pub async fn delete(&self, owner: DocumentOwner, document_id: Uuid) -> AppResult<Document> {
        let document = self.documents.delete(owner, document_id).await?;
        self.storage.delete(&document.file_path).await;
        Ok(document)
    }
}
