//! OpenAI-compatible completion adapter.
//!
//! Works with OpenRouter, OpenAI, DeepSeek, and any provider speaking the
//! OpenAI chat completions API format. Uses browser `fetch()` via gloo-net;
//! streaming reads SSE `data:` lines off the response `ReadableStream`.

use std::pin::Pin;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::Stream;
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{json, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use concierge_core::ports::{ChatRequest, ChatResponse, LlmPort, LlmStreamEvent, TokenUsage};
use concierge_types::{config::LlmConfig, message::Message, AssistantError, Result};

pub struct OpenAiCompatClient {
    config: LlmConfig,
    base_url: String,
}

impl OpenAiCompatClient {
    pub fn new(config: LlmConfig) -> Self {
        let base_url = config
            .api_base
            .clone()
            .unwrap_or_else(|| config.provider.default_base_url().to_string());
        Self { config, base_url }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request_body(req: &ChatRequest, stream: bool) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(message_to_json).collect();

        let mut body = json!({
            "model": req.model,
            "messages": messages,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });
        if stream {
            body["stream"] = json!(true);
        }
        body
    }
}

#[async_trait(?Send)]
impl LlmPort for OpenAiCompatClient {
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse> {
        let body = Self::build_request_body(&req, false);

        let response = Request::post(&self.completions_url())
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.config.api_key))
            .json(&body)
            .map_err(|e| AssistantError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssistantError::from_upstream(&extract_error_message(
                status, &text,
            )));
        }

        let data: ApiResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Llm(e.to_string()))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Llm("no choices in response".to_string()))?;

        let usage = data.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            text: choice.message.content.unwrap_or_default(),
            usage,
        })
    }

    fn stream_chat(
        &self,
        req: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>> {
        let url = self.completions_url();
        let auth = format!("Bearer {}", self.config.api_key);
        let body = Self::build_request_body(&req, true);
        let (tx, rx) = mpsc::unbounded();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(message) = pump_sse(&url, &auth, &body, &tx).await {
                let _ = tx.unbounded_send(LlmStreamEvent::Error(message));
            }
        });

        Box::pin(rx)
    }
}

/// Read the SSE response and forward deltas into the channel.
/// Errors carry the raw upstream message; classification happens in core.
async fn pump_sse(
    url: &str,
    auth: &str,
    body: &Value,
    tx: &mpsc::UnboundedSender<LlmStreamEvent>,
) -> std::result::Result<(), String> {
    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .header("Authorization", auth)
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(extract_error_message(status, &text));
    }

    let stream = response
        .body()
        .ok_or_else(|| "response has no body".to_string())?;
    let reader: ReadableStreamDefaultReader = stream
        .get_reader()
        .dyn_into()
        .map_err(|_| "unreadable response body".to_string())?;

    let mut buffer = String::new();
    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| format!("{:?}", e))?;
        let done = js_sys::Reflect::get(&chunk, &"done".into())
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }
        let value =
            js_sys::Reflect::get(&chunk, &"value".into()).map_err(|e| format!("{:?}", e))?;
        buffer.push_str(&String::from_utf8_lossy(&js_sys::Uint8Array::new(&value).to_vec()));

        // SSE frames are newline-delimited; a chunk may end mid-line,
        // so only complete lines are parsed.
        while let Some(pos) = buffer.find('\n') {
            let line: String = buffer.drain(..=pos).collect();
            match parse_sse_line(line.trim()) {
                Some(SseLine::Delta(delta)) => {
                    let _ = tx.unbounded_send(LlmStreamEvent::Delta(delta));
                }
                Some(SseLine::Done) => {
                    let _ = tx.unbounded_send(LlmStreamEvent::Done);
                    // [DONE] arrives before the body stream closes; cancel
                    // the reader so the connection is released immediately.
                    let _ = JsFuture::from(reader.cancel()).await;
                    return Ok(());
                }
                None => {}
            }
        }
    }

    let _ = tx.unbounded_send(LlmStreamEvent::Done);
    Ok(())
}

enum SseLine {
    Delta(String),
    Done,
}

fn parse_sse_line(line: &str) -> Option<SseLine> {
    let data = line.strip_prefix("data:")?.trim();
    if data == "[DONE]" {
        return Some(SseLine::Done);
    }
    let value: Value = serde_json::from_str(data).ok()?;
    let delta = value["choices"][0]["delta"]["content"].as_str()?;
    if delta.is_empty() {
        None
    } else {
        Some(SseLine::Delta(delta.to_string()))
    }
}

/// Pull `error.message` out of a non-2xx body; fall back to the raw text.
fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

fn message_to_json(msg: &Message) -> Value {
    json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    })
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_types::message::Message;

    #[test]
    fn test_parse_sse_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"Xin"}}]}"#;
        match parse_sse_line(line) {
            Some(SseLine::Delta(d)) => assert_eq!(d, "Xin"),
            _ => panic!("expected delta"),
        }
    }

    #[test]
    fn test_parse_sse_done() {
        assert!(matches!(parse_sse_line("data: [DONE]"), Some(SseLine::Done)));
    }

    #[test]
    fn test_parse_sse_ignores_noise() {
        assert!(parse_sse_line("").is_none());
        assert!(parse_sse_line(": keep-alive").is_none());
        assert!(parse_sse_line(r#"data: {"choices":[{"delta":{}}]}"#).is_none());
    }

    #[test]
    fn test_extract_error_message_field() {
        let body = r#"{"error":{"message":"Rate limit reached for requests"}}"#;
        assert_eq!(
            extract_error_message(429, body),
            "Rate limit reached for requests"
        );
    }

    #[test]
    fn test_extract_error_message_fallback() {
        assert_eq!(extract_error_message(502, "bad gateway"), "HTTP 502: bad gateway");
    }

    #[test]
    fn test_request_body_shape() {
        let req = ChatRequest {
            messages: vec![Message::system("chính sách"), Message::user("chào")],
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        };
        let body = OpenAiCompatClient::build_request_body(&req, false);
        assert_eq!(body["model"], "openai/gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "chào");
        assert!(body.get("stream").is_none());

        let streaming = OpenAiCompatClient::build_request_body(&req, true);
        assert_eq!(streaming["stream"], true);
    }
}
