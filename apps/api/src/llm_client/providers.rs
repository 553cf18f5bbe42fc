//! Chat-completion backends. Each provider wraps one vendor API behind the
//! `ChatProvider` trait; streaming variants accumulate text and stop early
//! once the caller's stop marker shows up in the output so far.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{ChatProvider, LineBuffer, LlmError};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const MAX_RETRIES: u32 = 3;

fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .expect("Failed to build HTTP client")
}

fn marker_seen(accumulated: &str, marker: &str) -> bool {
    accumulated.to_lowercase().contains(&marker.to_lowercase())
}

async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    LlmError::Api { status, message }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            model,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str, stream: bool) -> AnthropicRequest<'a> {
        AnthropicRequest {
            model: &self.model,
            max_tokens: 4096,
            temperature: 0.6,
            stream,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(prompt, stream))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    /// Retries on 429 and 5xx with exponential backoff.
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Anthropic call attempt {attempt} failed, retrying after {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.send(prompt, false).await {
                Ok(response) => {
                    let parsed: AnthropicResponse = response.json().await?;
                    let text = parsed
                        .content
                        .iter()
                        .find(|b| b.block_type == "text")
                        .and_then(|b| b.text.clone())
                        .ok_or(LlmError::EmptyContent)?;
                    return Ok(text);
                }
                Err(LlmError::Api { status, message }) if status == 429 || status >= 500 => {
                    last_error = Some(LlmError::Api { status, message });
                }
                Err(LlmError::Http(e)) => last_error = Some(LlmError::Http(e)),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }

    async fn invoke_stream(&self, prompt: &str, stop_marker: &str) -> Result<String, LlmError> {
        let mut response = self.send(prompt, true).await?;
        let mut lines = LineBuffer::new();
        let mut accumulated = String::new();

        'outer: while let Some(chunk) = response.chunk().await? {
            for line in lines.push(&chunk) {
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                let Ok(event) = serde_json::from_str::<Value>(data) else {
                    continue;
                };
                if event.get("type").and_then(Value::as_str) == Some("content_block_delta") {
                    if let Some(text) = event.pointer("/delta/text").and_then(Value::as_str) {
                        accumulated.push_str(text);
                    }
                }
                if marker_seen(&accumulated, stop_marker) {
                    debug!("Stop marker observed; ending Anthropic stream early");
                    break 'outer;
                }
            }
        }

        Ok(accumulated)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible (OpenAI, Groq)
// ────────────────────────────────────────────────────────────────────────────

pub struct OpenAiCompatibleProvider {
    client: Client,
    name: &'static str,
    base_url: &'static str,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleProvider {
    pub fn openai(api_key: String, model: String) -> Self {
        Self {
            client: http_client(),
            name: "openai",
            base_url: OPENAI_BASE_URL,
            api_key,
            model,
            temperature: 0.6,
        }
    }

    pub fn groq(api_key: String, model: String) -> Self {
        Self {
            client: http_client(),
            name: "groq",
            base_url: GROQ_BASE_URL,
            api_key,
            model,
            temperature: 0.7,
        }
    }

    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "temperature": self.temperature,
                "max_tokens": 4096,
                "stream": stream,
                "messages": [{"role": "user", "content": prompt}],
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.send(prompt, false).await?;
        let body: Value = response.json().await?;
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn invoke_stream(&self, prompt: &str, stop_marker: &str) -> Result<String, LlmError> {
        let mut response = self.send(prompt, true).await?;
        let mut lines = LineBuffer::new();
        let mut accumulated = String::new();

        'outer: while let Some(chunk) = response.chunk().await? {
            for line in lines.push(&chunk) {
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                if data.trim() == "[DONE]" {
                    break 'outer;
                }
                let Ok(event) = serde_json::from_str::<Value>(data) else {
                    continue;
                };
                if let Some(text) = event.pointer("/choices/0/delta/content").and_then(Value::as_str)
                {
                    accumulated.push_str(text);
                }
                if marker_seen(&accumulated, stop_marker) {
                    debug!("Stop marker observed; ending {} stream early", self.name);
                    break 'outer;
                }
            }
        }

        Ok(accumulated)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            model,
        }
    }

    fn body(prompt: &str) -> Value {
        json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 16384
            }
        })
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{GEMINI_BASE_URL}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let response = self.client.post(url).json(&Self::body(prompt)).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let body: Value = response.json().await?;
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn invoke_stream(&self, prompt: &str, stop_marker: &str) -> Result<String, LlmError> {
        let url = format!(
            "{GEMINI_BASE_URL}/{}:streamGenerateContent?alt=sse&key={}",
            self.model, self.api_key
        );
        let mut response = self.client.post(url).json(&Self::body(prompt)).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let mut lines = LineBuffer::new();
        let mut accumulated = String::new();

        'outer: while let Some(chunk) = response.chunk().await? {
            for line in lines.push(&chunk) {
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                let Ok(event) = serde_json::from_str::<Value>(data) else {
                    continue;
                };
                if let Some(text) = event
                    .pointer("/candidates/0/content/parts/0/text")
                    .and_then(Value::as_str)
                {
                    accumulated.push_str(text);
                }
                if marker_seen(&accumulated, stop_marker) {
                    debug!("Stop marker observed; ending Gemini stream early");
                    break 'outer;
                }
            }
        }

        Ok(accumulated)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ollama (local)
// ────────────────────────────────────────────────────────────────────────────

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: http_client(),
            base_url,
            model,
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let body: Value = response.json().await?;
        body.get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Ollama streams newline-delimited JSON objects rather than SSE.
    async fn invoke_stream(&self, prompt: &str, stop_marker: &str) -> Result<String, LlmError> {
        let mut response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": true,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let mut lines = LineBuffer::new();
        let mut accumulated = String::new();

        'outer: while let Some(chunk) = response.chunk().await? {
            for line in lines.push(&chunk) {
                let Ok(event) = serde_json::from_str::<Value>(&line) else {
                    continue;
                };
                if let Some(text) = event.get("response").and_then(Value::as_str) {
                    accumulated.push_str(text);
                }
                if event.get("done").and_then(Value::as_bool) == Some(true)
                    || marker_seen(&accumulated, stop_marker)
                {
                    break 'outer;
                }
            }
        }

        Ok(accumulated)
    }
}
