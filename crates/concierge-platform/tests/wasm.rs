//! WASM-target tests for concierge-platform (Node.js runtime).
//!
//! Tests the storage backends under wasm32-unknown-unknown via
//! `wasm-pack test --node`. Node has no `window`, so backend selection
//! must fall back to memory.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use concierge_core::ports::StoragePort;
use concierge_platform::storage::{open_storage, MemoryStorage};
use concierge_types::config::StorageBackendType;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    assert!(storage.get("nonexistent").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_get_remove() {
    let storage = MemoryStorage::new();
    storage.set("concierge:history", "[]").await.unwrap();
    assert_eq!(
        storage.get("concierge:history").await.unwrap().as_deref(),
        Some("[]")
    );
    storage.remove("concierge:history").await.unwrap();
    assert!(storage.get("concierge:history").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_overwrites() {
    let storage = MemoryStorage::new();
    storage.set("k", "a").await.unwrap();
    storage.set("k", "b").await.unwrap();
    assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("b"));
}

// ─── Backend Selection Tests ─────────────────────────────

#[wasm_bindgen_test]
async fn auto_falls_back_without_window() {
    let storage = open_storage(&StorageBackendType::Auto);
    assert_eq!(storage.backend_name(), "memory");
    storage.set("k", "v").await.unwrap();
    assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));
}

#[wasm_bindgen_test]
fn explicit_memory_backend() {
    let storage = open_storage(&StorageBackendType::Memory);
    assert_eq!(storage.backend_name(), "memory");
}
