// storage/mod.rs
pub(crate) mod file_store;
pub(crate) mod memory_store;

use crate::errors::Result;

/// Durable string key-value storage for client-side state.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
