pub(crate) mod flow;
pub(crate) mod mpesa_service;
pub(crate) mod qr_service;
pub(crate) mod transaction_log;
