use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Every LLM and image backend is optional — provider selection at startup
/// picks the first one that is actually configured, falling back to Ollama.
#[derive(Debug, Clone)]
pub struct Config {
    /// Preferred chat provider ("gemini", "openai", "claude", "groq", "ollama").
    /// Empty means the default preference order.
    pub llm_provider: String,

    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub ollama_url: String,
    pub ollama_model: String,

    pub hf_token: Option<String>,
    pub unsplash_access_key: Option<String>,

    pub style_presets_path: String,
    pub component_library_path: String,
    pub templates_dir: String,

    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_provider: optional_env("LLM_PROVIDER")
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.5-flash"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_model: env_or("ANTHROPIC_MODEL", "claude-3-5-sonnet-20241022"),
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_model: env_or("GROQ_MODEL", "llama-3.1-70b-versatile"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "mistral"),
            hf_token: optional_env("HF_TOKEN"),
            unsplash_access_key: optional_env("UNSPLASH_ACCESS_KEY"),
            style_presets_path: env_or("STYLE_PRESETS_PATH", "style_presets.json"),
            component_library_path: env_or("COMPONENT_LIBRARY_PATH", "component_library.json"),
            templates_dir: env_or("TEMPLATES_DIR", "templates"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
