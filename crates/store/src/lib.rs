//! Whole-value key-value persistence.
//!
//! Every top-level key holds one JSON document. Values are read once when a
//! screen hydrates and are overwritten in full on every mutation; there are no
//! partial writes and no schema version.

mod file;
mod memory;

use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const FAVORITES: &str = "favorites";
pub const RATINGS: &str = "ratings";
pub const MEAL_PLANS: &str = "mealPlans";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl From<StoreError> for mealdeck_shared::Error {
    fn from(value: StoreError) -> Self {
        Self::Store(value.to_string())
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes `key`, starting from `T::default()` when the value is
/// absent, unreadable or malformed.
pub fn load<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(_) => return T::default(),
        Err(err) => {
            tracing::warn!(key, err = %err, "Failed to read stored value, starting empty");

            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, err = %err, "Malformed stored value, starting empty");

            T::default()
        }
    }
}

/// Overwrites `key` with the whole encoded value.
pub fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;

    store.set(key, &raw)
}
