use serde::{Deserialize, Serialize};

/// Events emitted by the chat session.
/// The host UI drains these for reactive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A user message was accepted and a turn started
    TurnStart { turn_id: u64 },

    /// The assistant reply grew; `text` is the cumulative text-so-far
    Delta { text: String },

    /// The assistant finished a complete reply
    Complete { text: String },

    /// The turn finished (successfully or not)
    TurnEnd { turn_id: u64 },

    /// Catalog context was (re)loaded
    ContextReady { product_count: usize },

    /// The session was cleared
    SessionReset,

    /// A turn failed; `message` is localized and render-ready
    Error { message: String },
}
