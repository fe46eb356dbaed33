// services/mpesa_service.rs
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::money::Amount;
use crate::models::phone;

/// Message the provider sends when the STK prompt went out, whatever its
/// `success` flag says.
pub const CALLBACK_RECEIVED: &str = "callback received successfully";

const DEFAULT_SUCCESS_MESSAGE: &str = "Payment request sent";
const DEFAULT_FAILURE_MESSAGE: &str = "Payment request failed";

#[derive(Debug, Serialize)]
pub struct StkPushRequest {
    pub phone: String,
    pub amount: String,
}

impl StkPushRequest {
    pub fn new(phone_number: &str, amount: Amount) -> Self {
        let canonical = phone::normalize(phone_number);
        StkPushRequest {
            phone: phone::to_local(&canonical),
            amount: amount.to_request_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PaymentResult {
    pub fn failure(message: impl Into<String>) -> Self {
        PaymentResult {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Maps the provider's payload onto a [`PaymentResult`].
///
/// Order matters: the callback message wins over a `success: false` flag.
/// A payload without a `success` flag counts as success.
pub fn interpret_response(response: ProviderResponse) -> PaymentResult {
    let ProviderResponse { success, message, data } = response;
    let message = message.filter(|m| !m.trim().is_empty());

    if message.as_deref() == Some(CALLBACK_RECEIVED) {
        return PaymentResult {
            success: true,
            message: CALLBACK_RECEIVED.to_string(),
            data,
        };
    }

    if success == Some(false) {
        return PaymentResult {
            success: false,
            message: message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            data,
        };
    }

    PaymentResult {
        success: true,
        message: message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        data,
    }
}

/// Sends the STK push for one fare. Never returns an error: every failure is
/// folded into a `success: false` result.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn submit(&self, phone_number: &str, amount: Amount) -> PaymentResult;
}

#[derive(Debug, Clone)]
pub struct MpesaService {
    stk_url: String,
    api_key: String,
    client: Client,
}

impl MpesaService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.mpesa_timeout_secs))
            .build()?;

        Ok(MpesaService {
            stk_url: config.stk_push_url(),
            api_key: config.mpesa_api_key.clone(),
            client,
        })
    }

    async fn send(&self, request: &StkPushRequest) -> std::result::Result<PaymentResult, reqwest::Error> {
        let response = self.client
            .post(&self.stk_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let payload = match serde_json::from_str::<ProviderResponse>(&body) {
            Ok(payload) => payload,
            Err(e) => {
                error!("STK push returned an unreadable body: {} - {} ({})", status, body, e);
                let message = if status.is_success() {
                    DEFAULT_FAILURE_MESSAGE.to_string()
                } else {
                    format!("Provider returned status {}", status.as_u16())
                };
                return Ok(PaymentResult::failure(message));
            }
        };

        if status.is_success() || is_accepted(&payload) {
            return Ok(interpret_response(payload));
        }

        error!("STK push failed: {} - {}", status, body);
        let message = payload
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Provider returned status {}", status.as_u16()));
        Ok(PaymentResult {
            success: false,
            message,
            data: payload.data,
        })
    }
}

// A non-2xx reply only counts when the payload itself says the push went out.
fn is_accepted(payload: &ProviderResponse) -> bool {
    payload.message.as_deref() == Some(CALLBACK_RECEIVED) || payload.success == Some(true)
}

#[async_trait]
impl PaymentGateway for MpesaService {
    async fn submit(&self, phone_number: &str, amount: Amount) -> PaymentResult {
        let request = StkPushRequest::new(phone_number, amount);
        info!("STK push: {} - KSh {}", request.phone, amount);

        let result = match self.send(&request).await {
            Ok(result) => result,
            Err(e) => {
                error!("STK push request error: {}", e);
                let message = e.to_string();
                if message.is_empty() {
                    PaymentResult::failure(DEFAULT_FAILURE_MESSAGE)
                } else {
                    PaymentResult::failure(message)
                }
            }
        };

        if result.success {
            info!("STK push accepted for {}: {}", request.phone, result.message);
        } else {
            error!("STK push rejected for {}: {}", request.phone, result.message);
        }
        result
    }
}
