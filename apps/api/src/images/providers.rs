//! Image provider chain: each backend implements a single `try_resolve`
//! contract and the resolver walks the list in order, taking the first
//! success. Failures and timeouts are logged and treated as "try the next
//! one" — they never surface to the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
const FLUX_REPO: &str = "black-forest-labs/FLUX.1-dev";
const STABLE_DIFFUSION_REPO: &str = "stabilityai/stable-diffusion-3-5-large";
const UNSPLASH_RANDOM_URL: &str = "https://api.unsplash.com/photos/random";

/// Diffusion calls can legitimately take a while.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One backend in the resolver's fallback chain.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns a ready-to-embed source, or `None` to hand off to the next
    /// provider. Must never panic or propagate errors.
    async fn try_resolve(&self, prompt: &str) -> Option<String>;
}

fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Runs a text-to-image call against the Hugging Face inference API and
/// embeds the returned binary as a data URI.
async fn hf_generate(
    client: &Client,
    repo: &str,
    token: Option<&str>,
    prompt: &str,
    steps: u32,
    guidance: f64,
) -> Result<String, reqwest::Error> {
    let mut request = client.post(format!("{HF_INFERENCE_URL}/{repo}")).json(&json!({
        "inputs": prompt,
        "parameters": {
            "num_inference_steps": steps,
            "guidance_scale": guidance,
            "width": 1024,
            "height": 768
        }
    }));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(&bytes)))
}

/// Primary generation backend: FLUX.1-dev.
pub struct FluxProvider {
    client: Client,
    token: String,
}

impl FluxProvider {
    pub fn new(token: String) -> Self {
        Self {
            client: http_client(GENERATION_TIMEOUT),
            token,
        }
    }
}

#[async_trait]
impl ImageProvider for FluxProvider {
    fn name(&self) -> &'static str {
        "flux"
    }

    async fn try_resolve(&self, prompt: &str) -> Option<String> {
        match hf_generate(&self.client, FLUX_REPO, Some(&self.token), prompt, 28, 3.5).await {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("FLUX generation failed: {e}");
                None
            }
        }
    }
}

/// Secondary generation backend: Stable Diffusion 3.5 Large. Works
/// anonymously on the free tier, so the token is optional.
pub struct StableDiffusionProvider {
    client: Client,
    token: Option<String>,
}

impl StableDiffusionProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: http_client(GENERATION_TIMEOUT),
            token,
        }
    }
}

#[async_trait]
impl ImageProvider for StableDiffusionProvider {
    fn name(&self) -> &'static str {
        "stable-diffusion"
    }

    async fn try_resolve(&self, prompt: &str) -> Option<String> {
        match hf_generate(
            &self.client,
            STABLE_DIFFUSION_REPO,
            self.token.as_deref(),
            prompt,
            25,
            7.5,
        )
        .await
        {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("Stable Diffusion generation failed: {e}");
                None
            }
        }
    }
}

/// Keyword-based stock-photo fallback: one random landscape photo per query.
pub struct UnsplashProvider {
    client: Client,
    access_key: String,
}

impl UnsplashProvider {
    pub fn new(access_key: String) -> Self {
        Self {
            client: http_client(SEARCH_TIMEOUT),
            access_key,
        }
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn name(&self) -> &'static str {
        "unsplash"
    }

    async fn try_resolve(&self, prompt: &str) -> Option<String> {
        let result = async {
            let response = self
                .client
                .get(UNSPLASH_RANDOM_URL)
                .query(&[("query", prompt), ("orientation", "landscape")])
                .header("Authorization", format!("Client-ID {}", self.access_key))
                .send()
                .await?
                .error_for_status()?;
            let body: Value = response.json().await?;
            Ok::<Option<String>, reqwest::Error>(
                body.pointer("/urls/regular")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            )
        }
        .await;

        match result {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                warn!("Unsplash response missing urls.regular");
                None
            }
            Err(e) => {
                warn!("Unsplash lookup failed: {e}");
                None
            }
        }
    }
}
