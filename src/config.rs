// config.rs
use std::env;
use std::path::PathBuf;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mpesa_api_url: String,
    pub mpesa_api_key: String,
    pub mpesa_timeout_secs: u64,
    pub merchant_id: String,
    pub qr_service_url: String,
    pub transactions_dir: Option<PathBuf>,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(AppConfig {
            mpesa_api_url: required("MPESA_API_URL")?,
            mpesa_api_key: required("MPESA_API_KEY")?,
            mpesa_timeout_secs: parsed("MPESA_TIMEOUT_SECS", 30)?,
            merchant_id: env::var("MERCHANT_ID")
                .unwrap_or_else(|_| "EasyTransitPay".to_string()),
            qr_service_url: env::var("QR_SERVICE_URL")
                .unwrap_or_else(|_| "https://api.qrserver.com/v1/create-qr-code/".to_string()),
            transactions_dir: env::var("TRANSACTIONS_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            port: parsed("PORT", 10000)?,
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
        })
    }

    pub fn stk_push_url(&self) -> String {
        format!("{}/api/request/stk", self.mpesa_api_url.trim_end_matches('/'))
    }
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::configuration(format!("{} must be set", key))),
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}
