use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use corrdesk_application::SessionStorage;
use corrdesk_core::AppResult;

/// In-memory session storage implementation.
///
/// Stands in for the browser's durable storage in tests and headless
/// deployments. Writes are last-write-wins, matching the durable
/// storage contract.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
