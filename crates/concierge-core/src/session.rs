//! Chat session — the façade the UI consumes.
//!
//! One turn runs: accept user text → append + durable write → stream the
//! completion, growing the assistant message in place → settle with a final
//! durable write and a best-effort analytics log. Only one turn may be in
//! flight; a call while busy is an idempotent no-op.
//!
//! The async operations take the session as `Rc<RefCell<..>>` and borrow it
//! only inside short synchronous phases, never across an await. The host can
//! therefore poll `is_loading`/`messages` while a stream is in flight, and a
//! reset issued mid-stream runs between stream events instead of waiting for
//! the turn to finish.

use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;

use concierge_types::{
    catalog::{InteractionLog, ShopperContext},
    config::AssistantConfig,
    event::ChatEvent,
    message::Message,
    AssistantError, Result,
};

use crate::context::ContextCache;
use crate::debounce::WriteCoalescer;
use crate::event_bus::EventBus;
use crate::ports::{
    AnalyticsPort, CatalogPort, ChatRequest, Clock, LlmPort, LlmStreamEvent, StoragePort,
};
use crate::prompt::build_system_prompt;

/// Durable key for the serialized message array.
pub const HISTORY_KEY: &str = "concierge:history";
/// Durable key for the cached system prompt.
pub const PROMPT_KEY: &str = "concierge:system_prompt";

/// Per-turn state. Checked and transitioned at call time, so concurrent
/// callback closures cannot race the single-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Streaming,
    Settled,
}

pub struct ChatSession {
    config: AssistantConfig,
    shopper: ShopperContext,
    messages: Vec<Message>,
    system_prompt: String,
    pub(crate) state: TurnState,
    last_error: Option<AssistantError>,
    context_pending: bool,
    context: ContextCache,
    coalescer: WriteCoalescer,
    event_bus: EventBus,
    /// Bumped on reset; a stale in-flight stream sees the mismatch at its
    /// next event and drops out instead of resurrecting a cleared session.
    epoch: u64,
    turn_counter: u64,
}

impl ChatSession {
    pub fn new(config: AssistantConfig, shopper: ShopperContext, event_bus: EventBus) -> Self {
        let context = ContextCache::new(config.shop.catalog_ttl_ms);
        let coalescer = WriteCoalescer::new(config.shop.persist_debounce_ms);
        Self {
            config,
            shopper,
            messages: Vec::new(),
            system_prompt: String::new(),
            state: TurnState::Idle,
            last_error: None,
            context_pending: false,
            context,
            coalescer,
            event_bus,
            epoch: 0,
            turn_counter: 0,
        }
    }

    /// Restore persisted history, fetch the catalog snapshot, and compute
    /// the system prompt. A first-ever catalog failure blocks the chat; a
    /// refetch failure serves the previous snapshot.
    pub async fn init(
        session: &Rc<RefCell<Self>>,
        catalog: &dyn CatalogPort,
        storage: &dyn StoragePort,
        clock: &dyn Clock,
    ) -> Result<()> {
        session.borrow_mut().context_pending = true;

        match storage.get(HISTORY_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Message>>(&json) {
                Ok(messages) => session.borrow_mut().messages = messages,
                // No schema versioning exists for the stored shape;
                // anything unreadable is discarded.
                Err(e) => log::warn!("discarding unreadable stored history: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("history restore failed: {}", e),
        }

        let refetch_limit = {
            let s = session.borrow();
            if s.context.is_fresh(clock.now_ms()) {
                None
            } else {
                Some(s.config.shop.catalog_limit)
            }
        };
        let fetched = match refetch_limit {
            Some(limit) => Some(catalog.fetch_products(limit).await),
            None => None,
        };

        let prompt = {
            let mut s = session.borrow_mut();
            let s = &mut *s;
            s.context_pending = false;
            match fetched {
                Some(Ok(products)) => s.context.install(products, clock.now_ms()),
                Some(Err(e)) if s.context.has_snapshot() => {
                    log::warn!("catalog refresh failed, serving stale snapshot: {}", e);
                }
                Some(Err(e)) => return Err(e),
                None => {}
            }
            s.system_prompt =
                build_system_prompt(s.context.products(), &s.shopper, &s.config.shop);
            s.event_bus.emit(ChatEvent::ContextReady {
                product_count: s.context.products().len(),
            });
            s.system_prompt.clone()
        };
        write_prompt(storage, &prompt).await;
        Ok(())
    }

    /// Run one turn. No-op on blank input or while a turn is in flight.
    pub async fn send_message(
        session: &Rc<RefCell<Self>>,
        text: &str,
        llm: &dyn LlmPort,
        storage: &dyn StoragePort,
        analytics: &dyn AnalyticsPort,
        clock: &dyn Clock,
    ) -> Result<()> {
        let text = text.trim();
        let (epoch, turn_id, request, history) = match session.borrow_mut().begin_turn(text) {
            Some(begin) => begin,
            None => return Ok(()),
        };

        // The user message is written through immediately, not debounced,
        // so it survives navigation right after sending.
        if let Some(json) = history {
            write_history(storage, &json).await;
        }

        let mut stream = llm.stream_chat(request);
        let mut reply = String::new();
        let mut placeholder_pushed = false;

        while let Some(event) = stream.next().await {
            {
                let s = session.borrow();
                if s.epoch != epoch {
                    log::debug!("session reset during stream, dropping stale reply");
                    return Ok(());
                }
            }
            match event {
                LlmStreamEvent::Delta(token) => {
                    reply.push_str(&token);
                    let due = {
                        let mut s = session.borrow_mut();
                        s.apply_delta(&reply, &mut placeholder_pushed);
                        if s.coalescer.observe(clock.now_ms()) {
                            s.history_json()
                        } else {
                            None
                        }
                    };
                    if let Some(json) = due {
                        write_history(storage, &json).await;
                        session.borrow_mut().coalescer.flushed(clock.now_ms());
                    }
                }
                LlmStreamEvent::Done => break,
                LlmStreamEvent::Error(message) => {
                    let err = AssistantError::from_upstream(&message);
                    return Err(
                        Self::abort_turn(session, storage, turn_id, err, placeholder_pushed)
                            .await,
                    );
                }
            }
        }

        if reply.is_empty() {
            let err = AssistantError::Llm("empty completion".to_string());
            return Err(
                Self::abort_turn(session, storage, turn_id, err, placeholder_pushed).await,
            );
        }

        // Settled covers the final durable write; Idle only after it lands.
        let settled = {
            let mut s = session.borrow_mut();
            s.state = TurnState::Settled;
            s.coalescer.take_pending();
            s.history_json()
        };
        if let Some(json) = settled {
            write_history(storage, &json).await;
        }

        let entry = session.borrow_mut().finish_turn(turn_id, text, reply);
        analytics.log(entry);
        Ok(())
    }

    /// Clear the session and recompute the system prompt from the cached
    /// catalog snapshot. Safe to call while a turn is streaming: the epoch
    /// bump makes the stale stream drop out at its next event.
    pub async fn reset(session: &Rc<RefCell<Self>>, storage: &dyn StoragePort) {
        let prompt = {
            let mut s = session.borrow_mut();
            let s = &mut *s;
            s.epoch += 1;
            s.messages.clear();
            s.state = TurnState::Idle;
            s.last_error = None;
            s.coalescer.reset();
            s.system_prompt =
                build_system_prompt(s.context.products(), &s.shopper, &s.config.shop);
            s.event_bus.emit(ChatEvent::SessionReset);
            s.system_prompt.clone()
        };

        if let Err(e) = storage.remove(HISTORY_KEY).await {
            log::warn!("failed to clear stored history: {}", e);
        }
        write_prompt(storage, &prompt).await;
    }

    /// Flush any coalesced write; call before teardown.
    pub async fn flush(session: &Rc<RefCell<Self>>, storage: &dyn StoragePort) {
        let pending = {
            let mut s = session.borrow_mut();
            if s.coalescer.take_pending() {
                s.history_json()
            } else {
                None
            }
        };
        if let Some(json) = pending {
            write_history(storage, &json).await;
        }
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// True while a completion is in flight or the initial catalog fetch
    /// is pending.
    pub fn is_loading(&self) -> bool {
        self.context_pending || self.state != TurnState::Idle
    }

    pub fn last_error(&self) -> Option<&AssistantError> {
        self.last_error.as_ref()
    }

    /// Localized message of the most recent failed turn, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.last_error.as_ref().map(AssistantError::user_message)
    }

    // ─── Sync turn phases (each runs inside one short borrow) ─

    /// Guard checks and turn setup; `None` means the call is a no-op.
    fn begin_turn(&mut self, text: &str) -> Option<(u64, u64, ChatRequest, Option<String>)> {
        if text.is_empty() {
            return None;
        }
        if self.state != TurnState::Idle {
            log::debug!("turn already in flight, ignoring send");
            return None;
        }

        self.state = TurnState::Streaming;
        self.last_error = None;
        self.coalescer.reset();
        self.turn_counter += 1;
        let turn_id = self.turn_counter;
        self.event_bus.emit(ChatEvent::TurnStart { turn_id });
        self.messages.push(Message::user(text));

        Some((self.epoch, turn_id, self.build_request(), self.history_json()))
    }

    fn apply_delta(&mut self, cumulative: &str, placeholder_pushed: &mut bool) {
        if !*placeholder_pushed {
            self.messages.push(Message::assistant(""));
            *placeholder_pushed = true;
        }
        // The in-progress assistant message is always the most recent
        // entry; its content is replaced, never appended as a new message.
        if let Some(last) = self.messages.last_mut() {
            last.content = cumulative.to_string();
        }
        self.event_bus.emit(ChatEvent::Delta {
            text: cumulative.to_string(),
        });
    }

    fn finish_turn(&mut self, turn_id: u64, query: &str, reply: String) -> InteractionLog {
        let entry = InteractionLog {
            user_id: self.shopper.user_id.clone(),
            query: query.to_string(),
            response: reply.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        self.event_bus.emit(ChatEvent::Complete { text: reply });
        self.event_bus.emit(ChatEvent::TurnEnd { turn_id });
        self.state = TurnState::Idle;
        entry
    }

    /// Roll back the streaming placeholder so the message list equals the
    /// pre-call state plus the user message.
    fn fail_turn(
        &mut self,
        turn_id: u64,
        err: &AssistantError,
        placeholder_pushed: bool,
    ) -> Option<String> {
        if placeholder_pushed {
            self.messages.pop();
        }
        self.last_error = Some(err.clone());
        self.state = TurnState::Idle;
        self.event_bus.emit(ChatEvent::Error {
            message: err.user_message().to_string(),
        });
        self.event_bus.emit(ChatEvent::TurnEnd { turn_id });
        self.history_json()
    }

    async fn abort_turn(
        session: &Rc<RefCell<Self>>,
        storage: &dyn StoragePort,
        turn_id: u64,
        err: AssistantError,
        placeholder_pushed: bool,
    ) -> AssistantError {
        let json = session
            .borrow_mut()
            .fail_turn(turn_id, &err, placeholder_pushed);
        if let Some(json) = json {
            write_history(storage, &json).await;
        }
        err
    }

    fn build_request(&self) -> ChatRequest {
        // The entire visible history rides along on every call; no
        // truncation policy is defined upstream.
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.messages.iter().cloned());
        ChatRequest {
            messages,
            model: self.config.llm.model.clone(),
            max_tokens: self.config.llm.max_tokens,
            temperature: self.config.llm.temperature,
        }
    }

    fn history_json(&self) -> Option<String> {
        match serde_json::to_string(&self.messages) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("failed to serialize chat history: {}", e);
                None
            }
        }
    }
}

/// Best-effort durable write; a storage failure must not kill the turn.
async fn write_history(storage: &dyn StoragePort, json: &str) {
    if let Err(e) = storage.set(HISTORY_KEY, json).await {
        log::warn!("failed to persist chat history: {}", e);
    }
}

async fn write_prompt(storage: &dyn StoragePort, prompt: &str) {
    if let Err(e) = storage.set(PROMPT_KEY, prompt).await {
        log::warn!("failed to persist system prompt: {}", e);
    }
}
