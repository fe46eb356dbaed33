// handlers/transaction_handlers.rs
use axum::{extract::State, response::Json};

use crate::dtos::flow_dtos::TransactionsResponse;
use crate::models::transaction::TransactionView;
use crate::state::AppState;

// GET /api/transactions - newest first
pub async fn get_transactions(State(state): State<AppState>) -> Json<TransactionsResponse> {
    let log = state.transactions.lock().await;
    let transactions: Vec<TransactionView> = log.all().iter().map(TransactionView::from).collect();

    Json(TransactionsResponse {
        count: transactions.len(),
        transactions,
    })
}
