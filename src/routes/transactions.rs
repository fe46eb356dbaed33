use axum::{routing::get, Router};

use crate::handlers::transaction_handlers::get_transactions;
use crate::state::AppState;

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        // GET /api/transactions - recorded fares, newest first
        .route("/", get(get_transactions))
}
