//! Write coalescing for durable persistence during streaming.
//!
//! Streaming produces many partial updates per second; writing each one to
//! the durable store is wasteful. The coalescer admits at most one write per
//! interval and tracks whether a pending write remains, so callers can issue
//! an explicit final flush at stream end or teardown.

/// Decides when a durable write should actually happen.
///
/// Purely timestamp-driven — the caller supplies `now_ms` from a [`Clock`]
/// port, which keeps this testable without timers.
///
/// [`Clock`]: crate::ports::Clock
#[derive(Debug)]
pub struct WriteCoalescer {
    interval_ms: u64,
    last_flush_ms: Option<u64>,
    dirty: bool,
}

impl WriteCoalescer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_flush_ms: None,
            dirty: false,
        }
    }

    /// Record a pending write. Returns true when the caller should write
    /// now (first write, or the interval since the last write has elapsed).
    pub fn observe(&mut self, now_ms: u64) -> bool {
        self.dirty = true;
        match self.last_flush_ms {
            Some(last) if now_ms < last.saturating_add(self.interval_ms) => false,
            _ => true,
        }
    }

    /// Mark that the caller wrote at `now_ms`, opening a new window.
    pub fn flushed(&mut self, now_ms: u64) {
        self.dirty = false;
        self.last_flush_ms = Some(now_ms);
    }

    /// Whether a pending write remains, clearing the flag. Used for the
    /// explicit final flush at stream end or session teardown.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Forget the current window; the next `observe` flushes immediately.
    pub fn reset(&mut self) {
        self.last_flush_ms = None;
        self.dirty = false;
    }
}
