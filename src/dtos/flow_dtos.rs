use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::phone;
use crate::models::transaction::TransactionView;
use crate::services::flow::Screen;
use crate::services::mpesa_service::PaymentResult;

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ManualPaymentRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
}

fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if phone::is_valid(phone_number) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_number")
            .with_message("Please enter a valid phone number".into()))
    }
}

#[derive(Debug, Serialize)]
pub struct FlowResponse {
    #[serde(flatten)]
    pub screen: Screen,
    pub payment_in_flight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_amounts: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_amount: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub result: PaymentResult,
    pub flow: FlowResponse,
}

#[derive(Debug, Serialize)]
pub struct DoneResponse {
    pub success: bool,
    pub message: String,
    pub transaction: TransactionView,
    pub flow: FlowResponse,
}

#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub payload: serde_json::Value,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionView>,
    pub count: usize,
}
