//! Evaluación de vencimiento de documentos de vehículos
//!
//! Funciones puras sobre los documentos y un instante `now`; el dashboard
//! las usa para las alertas y las estadísticas.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::document::VehicleDocumentRow;

const SECONDS_PER_DAY: i64 = 86_400;
const EXPIRING_SOON_DAYS: i64 = 30;
const WARNING_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Valid,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
    Normal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpiryAlert {
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub document_id: Uuid,
    pub document_type: String,
    pub document_name: String,
    pub expiry_date: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub status: ExpiryStatus,
    pub alert_level: AlertLevel,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DocumentStats {
    pub total_documents: i64,
    pub expired_documents: i64,
    pub expiring_soon_documents: i64,
    pub valid_documents: i64,
}

/// Días completos hasta el vencimiento, redondeando hacia abajo
pub fn days_until_expiry(expiry_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry_date - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn expiry_status(days: i64) -> ExpiryStatus {
    if days < 0 {
        ExpiryStatus::Expired
    } else if days <= EXPIRING_SOON_DAYS {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Valid
    }
}

pub fn alert_level(days: i64) -> AlertLevel {
    if days < 0 {
        AlertLevel::Critical
    } else if days <= WARNING_DAYS {
        AlertLevel::Warning
    } else if days <= EXPIRING_SOON_DAYS {
        AlertLevel::Info
    } else {
        AlertLevel::Normal
    }
}

/// Alertas de todos los documentos con fecha de vencimiento, ordenadas por
/// `(days_until_expiry, document_type)`
pub fn expiry_alerts(documents: &[VehicleDocumentRow], now: DateTime<Utc>) -> Vec<ExpiryAlert> {
    let mut alerts: Vec<ExpiryAlert> = documents
        .iter()
        .filter_map(|doc| {
            let expiry_date = doc.expiry_date?;
            let days = days_until_expiry(expiry_date, now);
            Some(ExpiryAlert {
                vehicle_id: doc.vehicle_id,
                vehicle_name: doc.vehicle_name(),
                document_id: doc.document_id,
                document_type: doc.document_type.clone(),
                document_name: doc.file_name.clone(),
                expiry_date,
                days_until_expiry: days,
                status: expiry_status(days),
                alert_level: alert_level(days),
            })
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.days_until_expiry
            .cmp(&b.days_until_expiry)
            .then_with(|| a.document_type.cmp(&b.document_type))
    });
    alerts
}

/// Contadores por estado; sin fecha de vencimiento cuenta como válido
pub fn document_stats(documents: &[VehicleDocumentRow], now: DateTime<Utc>) -> DocumentStats {
    documents.iter().fold(DocumentStats::default(), |mut stats, doc| {
        stats.total_documents += 1;
        let status = doc
            .expiry_date
            .map(|expiry| expiry_status(days_until_expiry(expiry, now)))
            .unwrap_or(ExpiryStatus::Valid);
        match status {
            ExpiryStatus::Expired => stats.expired_documents += 1,
            ExpiryStatus::ExpiringSoon => stats.expiring_soon_documents += 1,
            ExpiryStatus::Valid => stats.valid_documents += 1,
        }
        stats
    })
}
