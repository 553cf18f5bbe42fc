//! Starter-template loading. Templates are plain HTML files under the
//! configured directory, addressed by name without extension.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::warn;

static STOCK_PHOTO_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"src="https://images\.unsplash\.com/photo-[^"]*""#).expect("valid regex")
});

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Loads `{dir}/{name}.html`. Returns `None` for unknown or invalid names.
///
/// Portfolio and resume templates ship with stock profile photos; those are
/// rewritten to `{{image: profile}}` so an uploaded headshot lands in place.
pub fn load_template(dir: &str, name: &str) -> Option<String> {
    if !is_valid_name(name) {
        warn!("Rejected template name '{name}'");
        return None;
    }

    let path = Path::new(dir).join(format!("{name}.html"));
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Template '{name}' not found at {}: {e}", path.display());
            return None;
        }
    };

    let lower = name.to_lowercase();
    if lower.contains("portfolio") || lower.contains("resume") {
        return Some(
            STOCK_PHOTO_SRC
                .replace_all(&content, r#"src="{{image: profile}}""#)
                .into_owned(),
        );
    }
    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_template(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(format!("{name}.html")), content).expect("write template");
    }

    #[test]
    fn test_loads_template_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(dir.path(), "landing", "<html><body>hi</body></html>");

        let content = load_template(dir.path().to_str().expect("utf-8 path"), "landing")
            .expect("template loads");
        assert_eq!(content, "<html><body>hi</body></html>");
    }

    #[test]
    fn test_missing_template_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_template(dir.path().to_str().expect("utf-8 path"), "nope").is_none());
    }

    #[test]
    fn test_path_traversal_names_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dir_str = dir.path().to_str().expect("utf-8 path");
        assert!(load_template(dir_str, "../secrets").is_none());
        assert!(load_template(dir_str, "a/b").is_none());
        assert!(load_template(dir_str, "").is_none());
    }

    #[test]
    fn test_portfolio_templates_get_profile_placeholder() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(
            dir.path(),
            "portfolio-modern",
            r#"<img src="https://images.unsplash.com/photo-1507003211169-abc?w=400" alt="me">"#,
        );

        let content = load_template(dir.path().to_str().expect("utf-8 path"), "portfolio-modern")
            .expect("template loads");
        assert_eq!(content, r#"<img src="{{image: profile}}" alt="me">"#);
    }

    #[test]
    fn test_non_portfolio_templates_keep_stock_photos() {
        let dir = tempfile::tempdir().expect("tempdir");
        let original = r#"<img src="https://images.unsplash.com/photo-123" alt="dish">"#;
        write_template(dir.path(), "restaurant", original);

        let content = load_template(dir.path().to_str().expect("utf-8 path"), "restaurant")
            .expect("template loads");
        assert_eq!(content, original);
    }
}
