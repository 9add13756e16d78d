//! WASM-target tests for concierge-core (Node.js runtime).
//!
//! Exercises the pure pieces (event bus, coalescer, prompt builder) under
//! wasm32-unknown-unknown via `wasm-pack test --node`. The session state
//! machine is covered by the native mock suite in `src/tests.rs`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use concierge_core::debounce::WriteCoalescer;
use concierge_core::event_bus::EventBus;
use concierge_core::prompt::{build_system_prompt, format_vnd};
use concierge_types::catalog::ShopperContext;
use concierge_types::config::ShopConfig;
use concierge_types::event::ChatEvent;

#[wasm_bindgen_test]
fn event_bus_round_trip() {
    let bus = EventBus::new();
    bus.emit(ChatEvent::TurnStart { turn_id: 1 });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn coalescer_one_flush_per_window() {
    let mut c = WriteCoalescer::new(1000);
    assert!(c.observe(0));
    c.flushed(0);
    assert!(!c.observe(500));
    assert!(c.observe(1000));
}

#[wasm_bindgen_test]
fn vnd_formatting() {
    assert_eq!(format_vnd(1_250_000.0), "1.250.000₫");
}

#[wasm_bindgen_test]
fn empty_catalog_prompt_is_valid() {
    let prompt = build_system_prompt(&[], &ShopperContext::default(), &ShopConfig::default());
    assert!(!prompt.is_empty());
}
