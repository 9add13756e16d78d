//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `concierge-core` (pure Rust).
//! Implementations live in `concierge-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use concierge_types::{
    catalog::{InteractionLog, ProductSummary},
    message::Message,
    Result,
};

// ─── Completion Port ─────────────────────────────────────────

/// Streaming event from a chat completion
#[derive(Debug, Clone)]
pub enum LlmStreamEvent {
    /// A partial token
    Delta(String),
    /// Stream finished
    Done,
    /// Raw upstream error message; classified by the session
    Error(String),
}

/// Request to send to the completions endpoint
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Complete (non-streaming) completion response
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait(?Send)]
pub trait LlmPort {
    /// Non-streaming chat completion
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// Streaming chat completion — returns a stream of events
    fn stream_chat(
        &self,
        req: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>>;
}

// ─── Storage Port ────────────────────────────────────────────

/// Durable client-side key-value store. Both persisted payloads
/// (history, system prompt) are JSON text, so values are strings.
#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value
    async fn remove(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Catalog Port ────────────────────────────────────────────

/// Read-only view of the product catalog.
#[async_trait(?Send)]
pub trait CatalogPort {
    /// Up to `limit` active products with denormalized brand/scent/variant data.
    async fn fetch_products(&self, limit: usize) -> Result<Vec<ProductSummary>>;
}

// ─── Analytics Port ──────────────────────────────────────────

/// Best-effort interaction sink. Implementations catch their own
/// failures; `log` never surfaces an error to the caller.
pub trait AnalyticsPort {
    fn log(&self, entry: InteractionLog);
}

// ─── Clock Port ──────────────────────────────────────────────

/// Millisecond time source. Injected so debounce and cache TTL
/// logic are testable with a mock clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}
