//! Placeholder Substitution Engine — replaces `{{image: label}}` tokens with
//! resolved `src="..."` attributes.
//!
//! Documents are assumed internally consistent in placeholder spelling, so
//! only the first variant that yields any match is applied. A verification
//! scan afterwards guarantees no placeholder syntax survives: leftovers are
//! force-converted into complete `<img>` tags with the deterministic
//! seeded fallback source.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::images::{seeded_fallback, LabelResolver, UploadedImages};

struct Variant {
    name: &'static str,
    pattern: Regex,
}

fn variant(name: &'static str, pattern: &str) -> Variant {
    Variant {
        name,
        pattern: Regex::new(pattern).expect("invalid placeholder variant pattern"),
    }
}

// Most constrained spellings first: src-wrapped before standalone, double
// braces before single.
static VARIANTS: Lazy<Vec<Variant>> = Lazy::new(|| {
    vec![
        variant(
            "src with double braces",
            r#"src="\{\{image:\s*([^}"]*?)\s*\}\}""#,
        ),
        variant(
            "src with single brace",
            r#"src="\{image:\s*([^}"]*?)\s*\}""#,
        ),
        variant("standalone double braces", r"\{\{image:\s*([^}]*?)\s*\}\}"),
        variant("standalone single brace", r"\{image:\s*([^}]*?)\s*\}"),
    ]
});

static REMAINING: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\{\{image:.*?\}\}").expect("invalid pattern"),
        Regex::new(r"\{image:.*?\}").expect("invalid pattern"),
    ]
});

// Catch-all for the aggressive pass: one or two braces on either side,
// however mangled the closing ended up.
static AGGRESSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{{1,2}\s*image:\s*([^}]*?)\s*\}{0,2}").expect("invalid pattern"));

/// Replaces every placeholder occurrence with a resolved `src="..."` attribute.
///
/// Each distinct label is resolved once per document, so repeated labels are
/// deterministic. Returns the input unchanged when no variant matches.
pub async fn substitute_placeholders(
    html: &str,
    resolver: &dyn LabelResolver,
    uploads: &UploadedImages,
    style_hint: Option<&str>,
) -> String {
    let mut out = html.to_string();

    if let Some(variant) = VARIANTS.iter().find(|v| v.pattern.is_match(&out)) {
        debug!("Substituting placeholders using variant: {}", variant.name);

        let labels: Vec<String> = variant
            .pattern
            .captures_iter(&out)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect();

        let mut resolved: HashMap<String, String> = HashMap::new();
        for label in labels {
            if resolved.contains_key(&label) {
                continue;
            }
            let source = resolver.resolve(&label, uploads, style_hint).await;
            resolved.insert(label, source);
        }

        out = variant
            .pattern
            .replace_all(&out, |caps: &Captures| {
                let label = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                match resolved.get(label) {
                    Some(source) => format!(r#"src="{source}""#),
                    None => format!(r#"src="{}""#, seeded_fallback(label, 800, 500)),
                }
            })
            .into_owned();
    }

    // Verification scan: the output must contain zero placeholder syntax.
    if REMAINING.iter().any(|p| p.is_match(&out)) {
        warn!("Placeholders survived substitution; applying aggressive catch-all pass");
        out = AGGRESSIVE
            .replace_all(&out, |caps: &Captures| {
                let label = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                format!(
                    r#"<img src="{}" alt="{label}">"#,
                    seeded_fallback(label, 800, 500)
                )
            })
            .into_owned();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Resolver stub that mirrors only the uploaded-map-wins rule and
    /// otherwise answers with the seeded fallback, so tests stay offline.
    struct StubResolver;

    #[async_trait]
    impl LabelResolver for StubResolver {
        async fn resolve(
            &self,
            label: &str,
            uploads: &UploadedImages,
            _style_hint: Option<&str>,
        ) -> String {
            if let Some(source) = uploads.get(label) {
                return source.clone();
            }
            seeded_fallback(label, 800, 500)
        }
    }

    fn no_uploads() -> UploadedImages {
        UploadedImages::new()
    }

    async fn run(html: &str, uploads: &UploadedImages) -> String {
        substitute_placeholders(html, &StubResolver, uploads, None).await
    }

    #[tokio::test]
    async fn test_src_wrapped_double_braces() {
        let html = r#"<img src="{{image: food-dish}}" alt="food-dish">"#;
        let out = run(html, &no_uploads()).await;
        assert!(out.contains(r#"src="https://picsum.photos/seed/food-dish/800/500""#));
        assert!(!out.contains("{{image:"));
    }

    #[tokio::test]
    async fn test_uploaded_image_takes_precedence() {
        let mut uploads = UploadedImages::new();
        uploads.insert(
            "profile".to_string(),
            "data:image/png;base64,AAAA".to_string(),
        );
        let html = r#"<img src="{{image: profile}}" alt="profile">"#;
        let out = run(html, &uploads).await;
        assert!(out.contains(r#"src="data:image/png;base64,AAAA""#));
    }

    #[tokio::test]
    async fn test_first_matching_variant_wins_for_whole_document() {
        // Both spellings present; only the src-wrapped double-brace variant
        // is applied, the single-brace leftover goes through the aggressive pass.
        let html = r#"<img src="{{image: a}}"> and {image: b}"#;
        let out = run(html, &no_uploads()).await;
        assert!(out.contains("seed/a/"));
        assert!(!out.contains("{{image:"));
        assert!(!out.contains("{image:"));
    }

    #[tokio::test]
    async fn test_standalone_placeholder_resolves() {
        let html = "<div>{{image: farm-produce}}</div>";
        let out = run(html, &no_uploads()).await;
        assert!(out.contains(r#"src="https://picsum.photos/seed/farm-produce/800/500""#));
    }

    #[tokio::test]
    async fn test_no_placeholders_is_noop() {
        let html = "<p>nothing to see</p>";
        assert_eq!(run(html, &no_uploads()).await, html);
    }

    #[tokio::test]
    async fn test_duplicate_labels_resolve_identically() {
        let html = "{{image: interior}} ... {{image: interior}}";
        let out = run(html, &no_uploads()).await;
        let first = out.find("seed/interior").expect("first occurrence");
        let last = out.rfind("seed/interior").expect("second occurrence");
        assert_ne!(first, last);
    }

    #[tokio::test]
    async fn test_aggressive_pass_eliminates_leftover_spellings() {
        // The src-wrapped variant wins for the document, leaving the
        // standalone occurrence for the catch-all pass.
        let html = r#"<img src="{{image: a}}"> and {{image: chef}}"#;
        let out = run(html, &no_uploads()).await;
        assert!(!out.contains("image:"));
        assert!(out.contains(r#"<img src="https://picsum.photos/seed/chef/800/500" alt="chef">"#));
    }

    #[tokio::test]
    async fn test_nested_tag_scenario_end_to_end() {
        // Normalizer output feeds substitution; the resolved src must not
        // contain an embedded tag.
        let normalized =
            crate::html::normalize::normalize_img_tags(r#"<img src="<img src="https://x/y.png" alt="profile">">"#);
        assert_eq!(normalized, "{{image: profile}}");
        let out = run(&normalized, &no_uploads()).await;
        assert!(out.starts_with(r#"src=""#));
        assert!(!out.contains("<img src=\"<img"));
    }
}
