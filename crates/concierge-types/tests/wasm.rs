//! WASM-target tests for concierge-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use concierge_types::catalog::*;
use concierge_types::config::*;
use concierge_types::message::*;
use concierge_types::AssistantError;

#[wasm_bindgen_test]
fn message_user() {
    let msg = Message::user("Xin chào");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Xin chào");
    assert!(!msg.id.is_empty());
}

#[wasm_bindgen_test]
fn message_ids_unique() {
    assert_ne!(Message::user("a").id, Message::user("a").id);
}

#[wasm_bindgen_test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
}

#[wasm_bindgen_test]
fn config_default_round_trips() {
    let config = AssistantConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: AssistantConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.shop.catalog_limit, config.shop.catalog_limit);
}

#[wasm_bindgen_test]
fn product_summary_defaults() {
    let p: ProductSummary = serde_json::from_str(
        r#"{"id":"p1","name":"N","slug":"n","brand":"B","price":1.0}"#,
    )
    .unwrap();
    assert!(p.scents.is_empty());
}

#[wasm_bindgen_test]
fn rate_limit_message_localized() {
    assert!(AssistantError::RateLimited.user_message().contains("thử lại"));
}
