//! WASM entry point — composes the chat session with its browser adapters.
//!
//! The host page holds a [`ChatWidget`], calls `init()` once, then drives
//! it with `send_message`/`reset_chat` and polls `drain_events_json` (or
//! `messages_json`) to render. The session operations borrow the shared
//! state only between awaits, so the getters stay callable while a reply
//! is streaming and a reset issued mid-turn takes effect at the next
//! stream event.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use concierge_core::event_bus::EventBus;
use concierge_core::ports::{AnalyticsPort, CatalogPort, Clock, LlmPort, StoragePort};
use concierge_core::session::ChatSession;
use concierge_platform::analytics::HttpAnalytics;
use concierge_platform::catalog::HttpCatalog;
use concierge_platform::llm::OpenAiCompatClient;
use concierge_platform::storage::open_storage;
use concierge_platform::time::BrowserClock;
use concierge_types::{catalog::ShopperContext, config::AssistantConfig};

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
}

/// Handle held by the host page; one per chat widget instance.
#[wasm_bindgen]
pub struct ChatWidget {
    session: Rc<RefCell<ChatSession>>,
    event_bus: EventBus,
    llm: Rc<dyn LlmPort>,
    storage: Rc<dyn StoragePort>,
    catalog: Rc<dyn CatalogPort>,
    analytics: Rc<dyn AnalyticsPort>,
    clock: Rc<dyn Clock>,
}

#[wasm_bindgen]
impl ChatWidget {
    /// `config_json` is a serialized `AssistantConfig`; `shopper_json` a
    /// serialized `ShopperContext` (may be empty for anonymous visitors).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, shopper_json: &str) -> Result<ChatWidget, JsError> {
        let config: AssistantConfig =
            serde_json::from_str(config_json).map_err(|e| JsError::new(&e.to_string()))?;
        let shopper: ShopperContext = if shopper_json.trim().is_empty() {
            ShopperContext::default()
        } else {
            serde_json::from_str(shopper_json).map_err(|e| JsError::new(&e.to_string()))?
        };

        let event_bus = EventBus::new();
        let session = ChatSession::new(config.clone(), shopper, event_bus.clone());

        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            event_bus,
            llm: Rc::new(OpenAiCompatClient::new(config.llm.clone())),
            storage: open_storage(&config.storage.backend),
            catalog: Rc::new(HttpCatalog::new(&config.shop)),
            analytics: Rc::new(HttpAnalytics::new(&config.shop.base_url)),
            clock: Rc::new(BrowserClock),
        })
    }

    /// Restore persisted history and fetch the catalog snapshot (async).
    pub fn init(&self) {
        let session = self.session.clone();
        let catalog = self.catalog.clone();
        let storage = self.storage.clone();
        let clock = self.clock.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) =
                ChatSession::init(&session, catalog.as_ref(), storage.as_ref(), clock.as_ref())
                    .await
            {
                log::error!("chat init failed: {}", e);
            }
        });
    }

    /// Dispatch a user message (async). No-op on blank input or while busy.
    pub fn send_message(&self, text: String) {
        let session = self.session.clone();
        let llm = self.llm.clone();
        let storage = self.storage.clone();
        let analytics = self.analytics.clone();
        let clock = self.clock.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = ChatSession::send_message(
                &session,
                &text,
                llm.as_ref(),
                storage.as_ref(),
                analytics.as_ref(),
                clock.as_ref(),
            )
            .await
            {
                log::error!("chat turn failed: {}", e);
            }
        });
    }

    /// Clear the session and recompute the system prompt. Effective even
    /// while a reply is streaming; the stale stream drops out.
    pub fn reset_chat(&self) {
        let session = self.session.clone();
        let storage = self.storage.clone();

        wasm_bindgen_futures::spawn_local(async move {
            ChatSession::reset(&session, storage.as_ref()).await;
        });
    }

    /// Flush any coalesced durable write; call on page hide/unload.
    pub fn flush(&self) {
        let session = self.session.clone();
        let storage = self.storage.clone();

        wasm_bindgen_futures::spawn_local(async move {
            ChatSession::flush(&session, storage.as_ref()).await;
        });
    }

    /// Current ordered messages as a JSON array, safe to render directly.
    pub fn messages_json(&self) -> String {
        serde_json::to_string(self.session.borrow().messages())
            .unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn is_loading(&self) -> bool {
        self.session.borrow().is_loading()
    }

    /// Localized message of the most recent failed turn, if any.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.session.borrow().error_message().map(str::to_string)
    }

    /// Drain pending chat events as a JSON array; poll once per frame.
    pub fn drain_events_json(&self) -> String {
        serde_json::to_string(&self.event_bus.drain()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn has_pending_events(&self) -> bool {
        self.event_bus.has_pending()
    }
}
