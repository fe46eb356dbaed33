// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Please enter a valid phone number")]
    InvalidPhoneNumber,

    #[error("Cannot {event} from the {screen} screen")]
    InvalidTransition { screen: String, event: String },

    #[error("A payment request is already being sent")]
    PaymentInFlight,

    #[error("{0}")]
    MpesaError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("HTTP client error: {0}")]
    HttpClientError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidAmount => (StatusCode::BAD_REQUEST, "Invalid amount".to_string()),
            AppError::InvalidPhoneNumber => (StatusCode::BAD_REQUEST, "Invalid phone number".to_string()),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, "Invalid transition".to_string()),
            AppError::PaymentInFlight => (StatusCode::CONFLICT, "Payment in flight".to_string()),
            AppError::MpesaError(_) => (StatusCode::BAD_GATEWAY, "M-Pesa error".to_string()),
            AppError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string()),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string()),
            AppError::ConfigurationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string()),
            AppError::HttpClientError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "HTTP client error".to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StorageError(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpClientError(err.to_string())
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_transition(screen: impl Into<String>, event: impl Into<String>) -> Self {
        AppError::InvalidTransition {
            screen: screen.into(),
            event: event.into(),
        }
    }

    pub fn mpesa(msg: impl Into<String>) -> Self {
        AppError::MpesaError(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::StorageError(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(AppError::InvalidAmount.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidPhoneNumber.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn flow_errors_are_conflicts() {
        let err = AppError::invalid_transition("amount input", "done");
        assert_eq!(err.to_string(), "Cannot done from the amount input screen");
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(AppError::PaymentInFlight.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn gateway_errors_are_bad_gateway() {
        let err = AppError::mpesa("insufficient funds");
        assert_eq!(err.to_string(), "insufficient funds");
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
