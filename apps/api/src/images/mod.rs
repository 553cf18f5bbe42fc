//! Image Resolver — maps a placeholder label to a concrete image source.
//!
//! Resolution is total: uploads win outright, then an ordered chain of
//! generation/search providers is tried, and the deterministic seeded
//! placeholder service guarantees a non-empty answer when everything else
//! is unreachable.

pub mod prompting;
pub mod providers;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Config;
use providers::{FluxProvider, ImageProvider, StableDiffusionProvider, UnsplashProvider};

/// Per-request map from placeholder label to a ready-to-embed image source
/// (remote URL or data URI). Built by the upload intake; read-only here.
pub type UploadedImages = HashMap<String, String>;

/// Deterministic placeholder-image URL seeded by the label. Repeated calls
/// with the same label always yield the same visually distinct image.
pub fn seeded_fallback(label: &str, width: u32, height: u32) -> String {
    format!("https://picsum.photos/seed/{label}/{width}/{height}")
}

/// Seam between the substitution engine and the resolver, so substitution
/// can be tested without network-backed providers.
#[async_trait]
pub trait LabelResolver: Send + Sync {
    async fn resolve(
        &self,
        label: &str,
        uploads: &UploadedImages,
        style_hint: Option<&str>,
    ) -> String;
}

/// Resolver backed by an ordered list of image providers.
pub struct ImageResolver {
    providers: Vec<Box<dyn ImageProvider>>,
}

impl ImageResolver {
    pub fn new(config: &Config) -> Self {
        let mut providers: Vec<Box<dyn ImageProvider>> = Vec::new();
        if let Some(token) = &config.hf_token {
            providers.push(Box::new(FluxProvider::new(token.clone())));
        }
        providers.push(Box::new(StableDiffusionProvider::new(
            config.hf_token.clone(),
        )));
        if let Some(key) = &config.unsplash_access_key {
            providers.push(Box::new(UnsplashProvider::new(key.clone())));
        }
        info!(
            "Image provider chain: [{}]",
            providers
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Self { providers }
    }

    #[cfg(test)]
    pub fn with_providers(providers: Vec<Box<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    /// Runs the provider chain with an enriched prompt. Returns `None` only
    /// when every provider fails or none is configured.
    async fn generate(&self, prompt: &str) -> Option<String> {
        let enriched = prompting::enrich(prompt);
        if enriched != prompt {
            debug!("Enriched image prompt: '{prompt}' -> '{enriched}'");
        }
        for provider in &self.providers {
            if let Some(source) = provider.try_resolve(&enriched).await {
                debug!("Provider '{}' resolved image prompt", provider.name());
                return Some(source);
            }
        }
        None
    }
}

fn is_profile_like(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.contains("profile") || lower.contains("avatar") || lower.contains("photo")
}

#[async_trait]
impl LabelResolver for ImageResolver {
    async fn resolve(
        &self,
        label: &str,
        uploads: &UploadedImages,
        style_hint: Option<&str>,
    ) -> String {
        // Uploaded content is authoritative, regardless of hints.
        if let Some(source) = uploads.get(label) {
            debug!("Using uploaded image for '{label}'");
            return source.clone();
        }

        if is_profile_like(label) {
            let mut prompt =
                format!("professional headshot portrait, {label}, high quality, business professional");
            if let Some(hint) = style_hint {
                prompt.push_str(&format!(", in the style of {hint}"));
            }
            return match self.generate(&prompt).await {
                Some(source) => source,
                None => seeded_fallback(label, 400, 400),
            };
        }

        // The label itself is context-specific (e.g. "farm-produce",
        // "salon-interior"); use it directly as the generation prompt.
        let prompt = match style_hint {
            Some(hint) => format!("{label}, {hint}"),
            None => label.to_string(),
        };
        match self.generate(&prompt).await {
            Some(source) => source,
            None => seeded_fallback(label, 800, 500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uploaded_image_wins_over_everything() {
        let resolver = ImageResolver::with_providers(vec![]);
        let mut uploads = UploadedImages::new();
        uploads.insert("profile".to_string(), "data:image/png;base64,XYZ".to_string());

        let source = resolver
            .resolve("profile", &uploads, Some("brutalist aesthetic"))
            .await;
        assert_eq!(source, "data:image/png;base64,XYZ");
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic_and_embeds_label() {
        let resolver = ImageResolver::with_providers(vec![]);
        let uploads = UploadedImages::new();

        let first = resolver.resolve("farm-produce", &uploads, None).await;
        let second = resolver.resolve("farm-produce", &uploads, None).await;
        assert_eq!(first, second);
        assert!(first.contains("/seed/farm-produce/"));
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn test_profile_like_labels_get_square_fallback() {
        let resolver = ImageResolver::with_providers(vec![]);
        let uploads = UploadedImages::new();

        let source = resolver.resolve("team-photo", &uploads, None).await;
        assert_eq!(source, "https://picsum.photos/seed/team-photo/400/400");
    }

    #[test]
    fn test_profile_detection_is_case_insensitive_substring() {
        assert!(is_profile_like("Profile"));
        assert!(is_profile_like("author-avatar"));
        assert!(is_profile_like("hero-PHOTO"));
        assert!(!is_profile_like("food-dish"));
    }
}
