use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::flow_handlers::{
    choose_manual, finish, get_flow, get_qr_code, go_back, submit_amount, submit_payment,
};
use crate::state::AppState;

pub fn flow_routes() -> Router<AppState> {
    Router::new()
        // GET /api/flow - current screen
        .route("/", get(get_flow))

        // Amount screen
        .route("/amount", post(submit_amount))

        // QR screen
        .route("/qr", get(get_qr_code))
        .route("/manual", post(choose_manual))

        // Manual payment screen: validates, sends the STK push, then confirms
        .route("/payment", post(submit_payment))

        // Confirmation screen
        .route("/done", post(finish))

        .route("/back", post(go_back))
}
