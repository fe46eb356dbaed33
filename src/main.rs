use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod dtos;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod storage;

use config::AppConfig;
use errors::Result;
use services::mpesa_service::MpesaService;
use services::qr_service::QrService;
use services::transaction_log::TransactionLog;
use state::AppState;
use storage::{file_store::FileStore, memory_store::MemoryStore, KeyValueStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match initialize_app_state(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("❌ Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(app_state);
    start_server(app, &config).await;
}

fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    let store: Arc<dyn KeyValueStore> = match &config.transactions_dir {
        Some(dir) => {
            tracing::info!("💾 Transactions stored in {}", dir.display());
            Arc::new(FileStore::open(dir)?)
        }
        None => {
            tracing::warn!("TRANSACTIONS_DIR not set, transactions are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let transactions = TransactionLog::load(store);

    let mpesa_service = MpesaService::new(config)?;
    tracing::info!("✅ M-Pesa service ready: {}", config.stk_push_url());

    let qr_service = QrService::new(config.merchant_id.clone(), config.qr_service_url.clone());

    Ok(AppState::new(Arc::new(mpesa_service), transactions, qr_service))
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .nest("/api/flow", routes::flow::flow_routes())
        .nest("/api/transactions", routes::transactions::transaction_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, config: &AppConfig) {
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid HOST/PORT {}:{}: {}", config.host, config.port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🚌 Transit fare payments"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
