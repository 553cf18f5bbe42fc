//! LLM Client — the single point of entry for all chat-model calls.
//!
//! ARCHITECTURAL RULE: no other module may call a model API directly.
//! All LLM interactions MUST go through a `ChatProvider`.
//!
//! Multiple hosted/local backends are supported; one is selected at startup
//! from a preference-ordered sequence, taking the first whose credentials are
//! configured. Ollama closes every sequence since it needs no key.

pub mod providers;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use providers::{
    AnthropicProvider, GeminiProvider, OllamaProvider, OpenAiCompatibleProvider,
};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A chat-completion backend. `invoke_stream` accumulates streamed chunks and
/// may stop early once `stop_marker` appears in the accumulated text — the
/// caller uses this to dodge provider-side output-length ceilings.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn invoke(&self, prompt: &str) -> Result<String, LlmError>;

    async fn invoke_stream(&self, prompt: &str, stop_marker: &str) -> Result<String, LlmError>;
}

/// Generates a document via streaming with early stop; if the streaming call
/// fails for any reason, one non-streaming fallback invocation is attempted
/// before the error is surfaced.
pub async fn generate_document(
    provider: &dyn ChatProvider,
    prompt: &str,
    stop_marker: &str,
) -> Result<String, LlmError> {
    match provider.invoke_stream(prompt, stop_marker).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(
                "Streaming invocation via '{}' failed ({e}); falling back to non-streaming call",
                provider.name()
            );
            provider.invoke(prompt).await
        }
    }
}

/// Picks the chat provider: the preferred backend first, then the rest of its
/// fallback sequence; the first configured one wins. Ollama needs no
/// credentials, so selection always succeeds.
pub fn select_provider(config: &Config) -> Arc<dyn ChatProvider> {
    let order: &[&str] = match config.llm_provider.as_str() {
        "groq" => &["groq", "openai", "claude", "gemini", "ollama"],
        "ollama" => &["ollama", "groq", "openai", "claude", "gemini"],
        "gemini" => &["gemini", "openai", "claude", "groq", "ollama"],
        "openai" => &["openai", "gemini", "claude", "groq", "ollama"],
        "claude" | "anthropic" => &["claude", "openai", "gemini", "groq", "ollama"],
        // Default preference prioritizes hosted coding-tuned models first.
        _ => &["gemini", "openai", "claude", "groq", "ollama"],
    };

    for name in order {
        let provider: Option<Arc<dyn ChatProvider>> = match *name {
            "gemini" => config.google_api_key.clone().map(|key| {
                Arc::new(GeminiProvider::new(key, config.gemini_model.clone()))
                    as Arc<dyn ChatProvider>
            }),
            "openai" => config.openai_api_key.clone().map(|key| {
                Arc::new(OpenAiCompatibleProvider::openai(
                    key,
                    config.openai_model.clone(),
                )) as Arc<dyn ChatProvider>
            }),
            "claude" => config.anthropic_api_key.clone().map(|key| {
                Arc::new(AnthropicProvider::new(key, config.anthropic_model.clone()))
                    as Arc<dyn ChatProvider>
            }),
            "groq" => config.groq_api_key.clone().map(|key| {
                Arc::new(OpenAiCompatibleProvider::groq(key, config.groq_model.clone()))
                    as Arc<dyn ChatProvider>
            }),
            "ollama" => Some(Arc::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            )) as Arc<dyn ChatProvider>),
            _ => None,
        };
        if let Some(provider) = provider {
            info!("Using '{}' chat provider", provider.name());
            return provider;
        }
    }

    // The loop always terminates at Ollama; this arm is unreachable but keeps
    // the signature infallible without a panic path.
    Arc::new(OllamaProvider::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
    ))
}

/// Splits streamed byte chunks into complete lines, holding back the
/// trailing partial line until the next chunk arrives.
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            lines.push(text.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_splits_complete_lines() {
        let mut buf = LineBuffer::new();
        let lines = buf.push(b"data: one\ndata: two\n");
        assert_eq!(lines, vec!["data: one", "data: two"]);
    }

    #[test]
    fn test_line_buffer_holds_partial_line() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(b"data: par").is_empty());
        let lines = buf.push(b"tial\r\n");
        assert_eq!(lines, vec!["data: partial"]);
    }

    #[test]
    fn test_default_selection_falls_back_to_ollama() {
        let config = Config {
            llm_provider: String::new(),
            google_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-sonnet-20241022".to_string(),
            groq_api_key: None,
            groq_model: "llama-3.1-70b-versatile".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "mistral".to_string(),
            hf_token: None,
            unsplash_access_key: None,
            style_presets_path: String::new(),
            component_library_path: String::new(),
            templates_dir: String::new(),
            port: 0,
            rust_log: String::new(),
        };
        assert_eq!(select_provider(&config).name(), "ollama");
    }

    #[test]
    fn test_preference_is_honored_when_configured() {
        let config = Config {
            llm_provider: "groq".to_string(),
            google_api_key: Some("g".to_string()),
            gemini_model: "gemini-2.5-flash".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-sonnet-20241022".to_string(),
            groq_api_key: Some("k".to_string()),
            groq_model: "llama-3.1-70b-versatile".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "mistral".to_string(),
            hf_token: None,
            unsplash_access_key: None,
            style_presets_path: String::new(),
            component_library_path: String::new(),
            templates_dir: String::new(),
            port: 0,
            rust_log: String::new(),
        };
        assert_eq!(select_provider(&config).name(), "groq");
    }
}
