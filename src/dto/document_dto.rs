use serde::Deserialize;

use crate::utils::errors::AppResult;
use crate::utils::validation::parse_optional_date_field;
use chrono::{DateTime, Utc};

/// `expiry_date` ausente o `null` borra la fecha
#[derive(Debug, Deserialize)]
pub struct UpdateExpiryRequest {
    pub expiry_date: Option<String>,
}

impl UpdateExpiryRequest {
    pub fn parse(&self) -> AppResult<Option<DateTime<Utc>>> {
        parse_optional_date_field("expiry_date", self.expiry_date.as_deref())
    }
}
