//! Best-effort interaction logging.
//!
//! One record per completed turn, posted fire-and-forget. Failures are
//! logged locally and never surface to the chat.

use gloo_net::http::Request;

use concierge_core::ports::AnalyticsPort;
use concierge_types::catalog::InteractionLog;

pub struct HttpAnalytics {
    endpoint: String,
}

impl HttpAnalytics {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/assistant/interactions", base_url),
        }
    }
}

impl AnalyticsPort for HttpAnalytics {
    fn log(&self, entry: InteractionLog) {
        let endpoint = self.endpoint.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let request = match Request::post(&endpoint).json(&entry) {
                Ok(req) => req,
                Err(e) => {
                    log::warn!("interaction log dropped: {}", e);
                    return;
                }
            };
            match request.send().await {
                Ok(resp) if !resp.ok() => {
                    log::warn!("interaction log rejected: HTTP {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("interaction log failed: {}", e),
            }
        });
    }
}
