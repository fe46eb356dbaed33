// services/qr_service.rs
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::money::Amount;

pub const CURRENCY: &str = "KES";

/// What the passenger's phone sees when scanning. Informational only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub amount: Amount,
    pub currency: &'static str,
    pub merchant_id: String,
    pub timestamp: DateTime<Utc>,
    pub reference: String,
}

#[derive(Debug, Clone)]
pub struct QrService {
    merchant_id: String,
    render_url: String,
}

impl QrService {
    pub fn new(merchant_id: impl Into<String>, render_url: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            render_url: render_url.into(),
        }
    }

    pub fn payload(&self, amount: Amount, now: DateTime<Utc>) -> QrPayload {
        QrPayload {
            amount,
            currency: CURRENCY,
            merchant_id: self.merchant_id.clone(),
            timestamp: now,
            reference: Uuid::new_v4().to_string(),
        }
    }

    pub fn image_url(&self, payload: &QrPayload) -> Result<String> {
        let data = serde_json::to_string(payload)?;
        let url = Url::parse_with_params(
            &self.render_url,
            &[("size", "200x200"), ("data", data.as_str())],
        )
        .map_err(|e| AppError::configuration(format!("Invalid QR service URL: {}", e)))?;
        Ok(url.to_string())
    }
}
