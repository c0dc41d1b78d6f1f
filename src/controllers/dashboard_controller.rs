use chrono::Utc;

use crate::dto::dashboard_dto::DashboardStats;
use crate::repositories::Repositories;
use crate::services::document_expiry_service::{document_stats, expiry_alerts, DocumentStats, ExpiryAlert};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    repositories: Repositories,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repositories: state.repositories.clone(),
        }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let drivers = self.repositories.drivers.stats().await?;
        let vehicles = self.repositories.vehicles.stats().await?;
        let rentals = self.repositories.rentals.stats().await?;
        Ok(DashboardStats::from_parts(&drivers, &vehicles, &rentals))
    }

    pub async fn document_stats(&self) -> AppResult<DocumentStats> {
        let documents = self.repositories.documents.vehicle_documents().await?;
        Ok(document_stats(&documents, Utc::now()))
    }

    pub async fn expiry_alerts(&self) -> AppResult<Vec<ExpiryAlert>> {
        let documents = self.repositories.documents.vehicle_documents().await?;
        Ok(expiry_alerts(&documents, Utc::now()))
    }
}
