pub(crate) mod flow_handlers;
pub(crate) mod transaction_handlers;
