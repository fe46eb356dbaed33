pub(crate) mod money;
pub(crate) mod phone;
pub(crate) mod transaction;
