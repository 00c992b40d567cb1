//! External LLM provider calls.
//!
//! One blocking request per extraction; no streaming. OpenAI and Groq share
//! the chat-completions format, Anthropic uses the Messages API.

use std::time::Duration;

use kgraph_core::{Error, Result};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ProviderSelection;
use crate::types::LLMProvider;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: usize = 4096;

/// A single system + user exchange.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f64,
}

/// Something that turns a prompt into the model's raw text reply.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Model name, for logs and status output.
    fn model(&self) -> &str;
}

/// Blocking HTTP backend for the hosted providers.
pub struct HttpCompletionBackend {
    http: Client,
    selection: ProviderSelection,
    timeout: Duration,
}

impl HttpCompletionBackend {
    pub fn new(selection: ProviderSelection, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            selection,
            timeout,
        })
    }

    fn send(&self, builder: reqwest::blocking::RequestBuilder) -> Result<Value> {
        let response = builder.send().map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Llm(format!("API error {}: {}", status, body)));
        }

        response.json::<Value>().map_err(|e| self.map_transport_error(e))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout.as_secs())
        } else {
            Error::Http(format!("Request failed: {}", e))
        }
    }

    fn complete_openai_compat(&self, url: &str, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.selection.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "temperature": request.temperature,
            "response_format": {"type": "json_object"},
        });

        debug!("Requesting extraction from {} with model {}", url, self.selection.model);

        let parsed = self.send(
            self.http
                .post(url)
                .header("Authorization", format!("Bearer {}", self.selection.api_key))
                .json(&body),
        )?;
        openai_reply_text(&parsed)
    }

    fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.selection.model,
            "system": request.system,
            "messages": [{"role": "user", "content": request.user}],
            "temperature": request.temperature,
            "max_tokens": ANTHROPIC_MAX_TOKENS,
        });

        debug!("Requesting extraction from Anthropic with model {}", self.selection.model);

        let parsed = self.send(
            self.http
                .post(ANTHROPIC_URL)
                .header("x-api-key", &self.selection.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )?;
        anthropic_reply_text(&parsed)
    }
}

impl CompletionBackend for HttpCompletionBackend {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self.selection.provider {
            LLMProvider::OpenAI => self.complete_openai_compat(OPENAI_URL, request),
            LLMProvider::Groq => self.complete_openai_compat(GROQ_URL, request),
            LLMProvider::Anthropic => self.complete_anthropic(request),
        }
    }

    fn model(&self) -> &str {
        &self.selection.model
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
fn openai_reply_text(parsed: &Value) -> Result<String> {
    parsed["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Llm(format!("response has no message content: {}", parsed)))
}

/// Concatenate the text blocks of a Messages API response.
fn anthropic_reply_text(parsed: &Value) -> Result<String> {
    let blocks = parsed["content"]
        .as_array()
        .ok_or_else(|| Error::Llm(format!("response has no content blocks: {}", parsed)))?;

    Ok(blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect::<Vec<_>>()
        .join(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_reply_text() {
        let parsed = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"nodes\": []}"}}]
        });
        assert_eq!(openai_reply_text(&parsed).unwrap(), "{\"nodes\": []}");

        let err = openai_reply_text(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[test]
    fn test_anthropic_reply_text() {
        let parsed = json!({
            "content": [
                {"type": "text", "text": "{\"nodes\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": " []}"}
            ]
        });
        assert_eq!(anthropic_reply_text(&parsed).unwrap(), "{\"nodes\": []}");
        assert!(anthropic_reply_text(&json!({"error": {}})).is_err());
    }

    #[test]
    fn test_backend_reports_model() {
        let backend = HttpCompletionBackend::new(
            ProviderSelection {
                provider: LLMProvider::Groq,
                model: "llama-3.3-70b-versatile".into(),
                api_key: "gsk".into(),
            },
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(backend.model(), "llama-3.3-70b-versatile");
    }
}
