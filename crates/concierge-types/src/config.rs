use serde::{Deserialize, Serialize};

/// Top-level assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub shop: ShopConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            storage: StorageConfig::default(),
            shop: ShopConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
    pub api_base: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenRouter,
            model: "openai/gpt-4o-mini".to_string(),
            api_key: String::new(),
            api_base: None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    OpenRouter,
    OpenAI,
    DeepSeek,
    Custom,
}

impl LlmProvider {
    pub fn default_base_url(&self) -> &str {
        match self {
            LlmProvider::OpenRouter => "https://openrouter.ai/api",
            LlmProvider::OpenAI => "https://api.openai.com",
            LlmProvider::DeepSeek => "https://api.deepseek.com",
            LlmProvider::Custom => "",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LlmProvider::OpenRouter => "OpenRouter",
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::DeepSeek => "DeepSeek",
            LlmProvider::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

/// Storefront-specific settings used by the prompt builder and the
/// platform adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub shop_name: String,
    /// Canonical base URL; product links are `{base_url}/san-pham/{slug}`.
    pub base_url: String,
    /// Maximum catalog records fetched for prompt grounding.
    pub catalog_limit: usize,
    /// Catalog snapshot time-to-live, milliseconds.
    pub catalog_ttl_ms: u64,
    /// Coalescing window for durable writes while streaming, milliseconds.
    pub persist_debounce_ms: u64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shop_name: "Hương Concierge".to_string(),
            base_url: "https://huongconcierge.vn".to_string(),
            catalog_limit: 24,
            catalog_ttl_ms: 60 * 60 * 1000,
            persist_debounce_ms: 1000,
        }
    }
}
