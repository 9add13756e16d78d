//! Cached catalog snapshot used for prompt grounding.

use concierge_types::catalog::ProductSummary;

/// Holds the last fetched snapshot with an hour-scale TTL.
///
/// The cache is purely synchronous bookkeeping; the session decides when to
/// fetch (only while the snapshot is stale) and what a refetch failure means
/// (serve the previous snapshot, or propagate a first-ever failure).
pub struct ContextCache {
    products: Vec<ProductSummary>,
    fetched_at_ms: Option<u64>,
    ttl_ms: u64,
}

impl ContextCache {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            products: Vec::new(),
            fetched_at_ms: None,
            ttl_ms,
        }
    }

    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    pub fn is_fresh(&self, now_ms: u64) -> bool {
        match self.fetched_at_ms {
            Some(at) => now_ms < at.saturating_add(self.ttl_ms),
            None => false,
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.fetched_at_ms.is_some()
    }

    /// Replace the snapshot and restart the TTL window.
    pub fn install(&mut self, products: Vec<ProductSummary>, now_ms: u64) {
        self.products = products;
        self.fetched_at_ms = Some(now_ms);
    }
}
