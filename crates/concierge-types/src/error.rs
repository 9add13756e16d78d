use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl AssistantError {
    /// User-facing localized message, shown inline in the chat UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistantError::RateLimited => {
                "Hệ thống đang nhận quá nhiều yêu cầu, vui lòng thử lại sau ít phút."
            }
            AssistantError::Catalog(_) => {
                "Không thể tải dữ liệu sản phẩm, vui lòng thử lại."
            }
            _ => "Đã có lỗi xảy ra, vui lòng thử lại.",
        }
    }

    /// Classify a raw error message from the completions endpoint.
    pub fn from_upstream(message: &str) -> Self {
        if message.to_lowercase().contains("rate limit") {
            AssistantError::RateLimited
        } else {
            AssistantError::Llm(message.to_string())
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(e: serde_json::Error) -> Self {
        AssistantError::Serialization(e.to_string())
    }
}
