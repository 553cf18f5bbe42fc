//! Placeholder Normalizer — rewrites malformed and nested `<img>` tags the
//! model sometimes emits back into the canonical `{{image: label}}` syntax.
//!
//! The model is instructed to never emit real `<img src=...>` tags, but it
//! does anyway, and occasionally nests one tag inside another's `src`
//! attribute (literally or HTML-entity-escaped). Rules are applied most
//! specific first so a broad pattern never swallows input meant for a
//! narrower one. The label is recovered from the `alt` attribute when
//! possible; otherwise a fixed fallback label is used.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Label used when no `alt` text is recoverable from a malformed tag.
pub const FALLBACK_LABEL: &str = "restaurant-interior";

enum LabelSource {
    /// Take the label from this capture group.
    Group(usize),
    /// No alt text recoverable; use a fixed label.
    Fixed(&'static str),
    /// Residual fragment with no usable structure; remove it entirely.
    Delete,
}

struct NormalizeRule {
    pattern: Regex,
    label: LabelSource,
}

fn rule(pattern: &str, label: LabelSource) -> NormalizeRule {
    NormalizeRule {
        pattern: Regex::new(pattern).expect("invalid normalize rule pattern"),
        label,
    }
}

static RULES: Lazy<Vec<NormalizeRule>> = Lazy::new(|| {
    vec![
        // Literal double-nesting: src value is itself a complete <img> tag.
        rule(
            r#"<img\s+src="<img\s+src="[^"]*"\s+alt="([^"]*)"[^>]*>"[^>]*>"#,
            LabelSource::Group(1),
        ),
        // Entity-escaped nested tag with its own quoted alt, wrapped in a
        // literal outer tag that repeats the alt.
        rule(
            r#"<img\s+src="&lt;img\s+src="([^"]+)"\s+alt="([^"]+)"&gt;"\s+alt="([^"]+)">"#,
            LabelSource::Group(2),
        ),
        // Escaped nesting whose URL carries entity-escaped query-string
        // ampersands (CDN-style URLs); consume up to the first escaped quote.
        rule(
            r#"<img\s+src="&lt;img\s+src="([^"]*?)(?:&amp;[^&]*)*&quot;[^>]*&gt;"\s+alt="([^"]+)">"#,
            LabelSource::Group(2),
        ),
        // Escaped nesting terminated by &quot; instead of a literal quote.
        rule(
            r#"<img\s+src="&lt;img\s+src="[^"]*&quot;[^>]*&gt;"\s+alt="([^"]+)">"#,
            LabelSource::Group(1),
        ),
        // Escaped nesting with a properly quoted inner URL.
        rule(
            r#"<img\s+src="&lt;img\s+src="[^"]*"[^>]*&gt;"\s+alt="([^"]+)">"#,
            LabelSource::Group(1),
        ),
        // Fully entity-escaped inner tag (both quotes escaped) inside a
        // literal outer tag; no recoverable alt.
        rule(
            r#"<img\s+src="&lt;img\s+src=&quot;[^&]*&quot;[^>]*&gt;"[^>]*>"#,
            LabelSource::Fixed(FALLBACK_LABEL),
        ),
        // Bare escaped tag with literal-quoted attributes.
        rule(
            r#"&lt;img\s+src="([^"]+)"\s+alt="([^"]+)"&gt;"#,
            LabelSource::Group(2),
        ),
        // Bare escaped tag with escaped quotes and no alt.
        rule(
            r#"&lt;img\s+src=&quot;https?://[^&]*&quot;[^>]*&gt;"#,
            LabelSource::Fixed(FALLBACK_LABEL),
        ),
        // Structurally fine single-URL tag: still normalized to a placeholder
        // so resolution (not the model's raw URL) decides the final source.
        rule(
            r#"<img\s+src="https?://[^"]*"\s+alt="([^"]*)">"#,
            LabelSource::Group(1),
        ),
        // Residual fragments no full pattern matched: delete, never leave dangling.
        rule(r#"<img\s+src="&lt;img[^>]*>"[^>]*>"#, LabelSource::Delete),
        rule(r#"&lt;img[^>]*&gt;"#, LabelSource::Delete),
    ]
});

fn placeholder(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        format!("{{{{image: {FALLBACK_LABEL}}}}}")
    } else {
        format!("{{{{image: {label}}}}}")
    }
}

/// Rewrites every recognized malformed `<img>` shape to `{{image: label}}`.
///
/// After this pass no `src` attribute contains another tag, literal or
/// entity-escaped.
pub fn normalize_img_tags(html: &str) -> String {
    let mut out = html.to_string();
    for rule in RULES.iter() {
        out = rule
            .pattern
            .replace_all(&out, |caps: &Captures| match &rule.label {
                LabelSource::Group(i) => {
                    placeholder(caps.get(*i).map(|m| m.as_str()).unwrap_or(""))
                }
                LabelSource::Fixed(label) => placeholder(label),
                LabelSource::Delete => String::new(),
            })
            .into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_double_nesting_uses_alt_label() {
        let input = r#"<img src="<img src="https://x/y.png" alt="profile">">"#;
        assert_eq!(normalize_img_tags(input), "{{image: profile}}");
    }

    #[test]
    fn test_simple_url_tag_is_renormalized() {
        let input = r#"<img src="https://example.com/pic.jpg" alt="food-dish">"#;
        assert_eq!(normalize_img_tags(input), "{{image: food-dish}}");
    }

    #[test]
    fn test_escaped_nested_tag_recovers_alt() {
        let input = r#"&lt;img src="https://example.com/a.jpg" alt="hero-banner"&gt;"#;
        assert_eq!(normalize_img_tags(input), "{{image: hero-banner}}");
    }

    #[test]
    fn test_escaped_tag_without_alt_falls_back() {
        let input = r#"&lt;img src=&quot;https://example.com/a.jpg&quot; width=400&gt;"#;
        assert_eq!(
            normalize_img_tags(input),
            format!("{{{{image: {FALLBACK_LABEL}}}}}")
        );
    }

    #[test]
    fn test_cdn_url_with_escaped_query_string() {
        let input = concat!(
            r#"<img src="&lt;img src="https://media.licdn.com/dms/image/v2/abc"#,
            r#"?e=1766016000&amp;v=beta&amp;t=token&quot; alt="profile"&gt;" alt="profile">"#
        );
        assert_eq!(normalize_img_tags(input), "{{image: profile}}");
    }

    #[test]
    fn test_residual_escaped_fragment_is_deleted() {
        let input = r#"<p>before</p>&lt;img class="broken"&gt;<p>after</p>"#;
        assert_eq!(normalize_img_tags(input), "<p>before</p><p>after</p>");
    }

    #[test]
    fn test_no_src_contains_nested_tag_after_pass() {
        let input = concat!(
            r#"<div><img src="<img src="https://a/b.png" alt="team">"></div>"#,
            r#"<img src="&lt;img src="https://c/d.png" alt="office"&gt;" alt="office">"#,
        );
        let out = normalize_img_tags(input);
        assert!(!out.contains(r#"src="<img"#));
        assert!(!out.contains("&lt;img"));
        assert!(out.contains("{{image: team}}"));
        assert!(out.contains("{{image: office}}"));
    }

    #[test]
    fn test_untouched_html_passes_through() {
        let input = "<section><h2>About</h2><p>No images here.</p></section>";
        assert_eq!(normalize_img_tags(input), input);
    }

    #[test]
    fn test_empty_alt_uses_fallback_label() {
        let input = r#"<img src="https://example.com/pic.jpg" alt="">"#;
        assert_eq!(
            normalize_img_tags(input),
            format!("{{{{image: {FALLBACK_LABEL}}}}}")
        );
    }
}
