//! Browser clock — millisecond time source for debounce and cache TTL.

use concierge_core::ports::Clock;

pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}
