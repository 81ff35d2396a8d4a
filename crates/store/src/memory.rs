use std::{collections::HashMap, sync::RwLock};

use crate::{KeyValueStore, StoreError};

/// In-process store, used by tests and as a throwaway backend.
#[derive(Default, Debug)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }

        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .read()
            .map_err(|_| StoreError::Io(std::io::Error::other("memory store poisoned")))?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StoreError::Io(std::io::Error::other("memory store poisoned")))?;

        values.insert(key.to_owned(), value.to_owned());

        Ok(())
    }
}
