use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{AppError, Result};
use crate::services::flow::FlowContext;
use crate::services::mpesa_service::PaymentGateway;
use crate::services::qr_service::QrService;
use crate::services::transaction_log::TransactionLog;

#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<Mutex<FlowContext>>,
    pub transactions: Arc<Mutex<TransactionLog>>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub qr_service: Arc<QrService>,
    payment_in_flight: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        transactions: TransactionLog,
        qr_service: QrService,
    ) -> Self {
        AppState {
            flow: Arc::new(Mutex::new(FlowContext::new())),
            transactions: Arc::new(Mutex::new(transactions)),
            gateway,
            qr_service: Arc::new(qr_service),
            payment_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn payment_in_flight(&self) -> bool {
        self.payment_in_flight.load(Ordering::SeqCst)
    }

    /// Claims the single payment slot. Released when the guard drops.
    pub fn begin_payment(&self) -> Result<InFlightGuard> {
        self.payment_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AppError::PaymentInFlight)?;
        Ok(InFlightGuard {
            flag: self.payment_in_flight.clone(),
        })
    }
}

pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
