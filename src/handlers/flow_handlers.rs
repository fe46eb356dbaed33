// handlers/flow_handlers.rs
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::dtos::flow_dtos::{
    AmountRequest, DoneResponse, FlowResponse, ManualPaymentRequest, PaymentResponse,
    QrCodeResponse,
};
use crate::errors::{AppError, Result};
use crate::models::money::{Amount, PRESET_AMOUNTS};
use crate::models::transaction::TransactionView;
use crate::services::flow::{FlowEvent, Screen};
use crate::state::AppState;

fn flow_response(screen: &Screen, payment_in_flight: bool) -> FlowResponse {
    let (preset_amounts, display_amount) = match screen {
        Screen::AmountInput => (Some(PRESET_AMOUNTS.to_vec()), None),
        Screen::QrCode { amount }
        | Screen::ManualPayment { amount }
        | Screen::Confirmation { amount, .. } => (None, Some(amount.display_ksh())),
    };

    FlowResponse {
        screen: screen.clone(),
        payment_in_flight,
        preset_amounts,
        display_amount,
    }
}

async fn apply_event(state: &AppState, event: FlowEvent) -> Result<Json<FlowResponse>> {
    let mut flow = state.flow.lock().await;
    flow.apply(event)?;
    Ok(Json(flow_response(flow.screen(), state.payment_in_flight())))
}

// GET /api/flow
pub async fn get_flow(State(state): State<AppState>) -> Json<FlowResponse> {
    let flow = state.flow.lock().await;
    Json(flow_response(flow.screen(), state.payment_in_flight()))
}

// POST /api/flow/amount
pub async fn submit_amount(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<FlowResponse>> {
    let amount = Amount::parse(&request.amount)?;
    info!("Amount submitted: KSh {}", amount);
    apply_event(&state, FlowEvent::SubmitAmount(amount)).await
}

// POST /api/flow/manual
pub async fn choose_manual(State(state): State<AppState>) -> Result<Json<FlowResponse>> {
    apply_event(&state, FlowEvent::ChooseManual).await
}

// POST /api/flow/payment
pub async fn submit_payment(
    State(state): State<AppState>,
    Json(request): Json<ManualPaymentRequest>,
) -> Result<impl IntoResponse> {
    if request.validate().is_err() {
        return Err(AppError::InvalidPhoneNumber);
    }

    // The slot is claimed under the flow lock so back cannot slip in between.
    let (guard, amount) = {
        let flow = state.flow.lock().await;
        let guard = state.begin_payment()?;
        match flow.screen() {
            Screen::ManualPayment { amount } => (guard, *amount),
            screen => {
                return Err(AppError::invalid_transition(
                    screen.name(),
                    FlowEvent::PaymentAccepted(request.phone_number.clone()).to_string(),
                ))
            }
        }
    };

    // The flow lock is not held across the provider call so the screen stays readable.
    let result = state.gateway.submit(&request.phone_number, amount).await;
    if !result.success {
        warn!("Payment for KSh {} not accepted: {}", amount, result.message);
        return Err(AppError::mpesa(result.message));
    }

    let mut flow = state.flow.lock().await;
    flow.apply(FlowEvent::PaymentAccepted(request.phone_number))?;
    drop(guard);

    let response = PaymentResponse {
        result,
        flow: flow_response(flow.screen(), state.payment_in_flight()),
    };
    Ok((StatusCode::OK, Json(response)))
}

// POST /api/flow/back
pub async fn go_back(State(state): State<AppState>) -> Result<Json<FlowResponse>> {
    let mut flow = state.flow.lock().await;
    if state.payment_in_flight() {
        return Err(AppError::PaymentInFlight);
    }
    flow.apply(FlowEvent::Back)?;
    Ok(Json(flow_response(flow.screen(), false)))
}

// POST /api/flow/done
pub async fn finish(State(state): State<AppState>) -> Result<Json<DoneResponse>> {
    let mut flow = state.flow.lock().await;

    // Only leave the confirmation screen once the record is stored.
    let mut next = flow.clone();
    let completed = next
        .apply(FlowEvent::Done)?
        .ok_or_else(|| AppError::invalid_transition(flow.screen().name(), "finish"))?;

    let transaction = {
        let mut log = state.transactions.lock().await;
        log.record_completed(completed, Utc::now())?
    };
    *flow = next;

    Ok(Json(DoneResponse {
        success: true,
        message: "Transaction recorded".to_string(),
        transaction: TransactionView::from(&transaction),
        flow: flow_response(flow.screen(), state.payment_in_flight()),
    }))
}

// GET /api/flow/qr
pub async fn get_qr_code(State(state): State<AppState>) -> Result<Json<QrCodeResponse>> {
    let amount = {
        let flow = state.flow.lock().await;
        match flow.screen() {
            Screen::QrCode { amount } => *amount,
            screen => return Err(AppError::invalid_transition(screen.name(), "show the QR code")),
        }
    };

    let payload = state.qr_service.payload(amount, Utc::now());
    let image_url = state.qr_service.image_url(&payload)?;

    Ok(Json(QrCodeResponse {
        payload: serde_json::to_value(&payload)?,
        image_url,
    }))
}
