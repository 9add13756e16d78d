//! Storage backend selection.
//!
//! `Auto` prefers localStorage (persistent) and falls back to memory.
//! An explicit localStorage request also falls back with a warning rather
//! than leaving the chat without persistence at all.

use std::rc::Rc;

use concierge_core::ports::StoragePort;
use concierge_types::config::StorageBackendType;

use super::{LocalStorage, MemoryStorage};

/// Open the configured storage backend.
/// Returns a trait object so callers are backend-agnostic.
pub fn open_storage(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    match backend {
        StorageBackendType::Memory => Rc::new(MemoryStorage::new()),
        StorageBackendType::LocalStorage | StorageBackendType::Auto => {
            match LocalStorage::open() {
                Ok(store) => {
                    log::info!("Storage backend: localStorage");
                    Rc::new(store)
                }
                Err(e) => {
                    log::warn!("localStorage unavailable ({}), falling back to memory", e);
                    Rc::new(MemoryStorage::new())
                }
            }
        }
    }
}
