//! `localStorage` backend — the durable client-side key-value store.
//! Persistent across page reloads; synchronous under the hood, but kept
//! behind the async port so callers stay backend-agnostic.

use async_trait::async_trait;

use concierge_core::ports::StoragePort;
use concierge_types::{AssistantError, Result};

pub struct LocalStorage {
    store: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| AssistantError::Storage("no window object".to_string()))?;
        let store = window
            .local_storage()
            .map_err(|e| AssistantError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| AssistantError::Storage("localStorage not available".to_string()))?;
        Ok(Self { store })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.store
            .get_item(key)
            .map_err(|e| AssistantError::Storage(format!("{:?}", e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // Quota-exceeded surfaces here as Err.
        self.store
            .set_item(key, value)
            .map_err(|e| AssistantError::Storage(format!("{:?}", e)))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.store
            .remove_item(key)
            .map_err(|e| AssistantError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}
