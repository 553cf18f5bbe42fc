//! Structural Repair Pass — pattern-based rewrites for incomplete markup the
//! generation step produces.
//!
//! Every step is a corrective text substitution: no match means a silent
//! no-op, and the whole pass is idempotent — each wrapping step checks for
//! its own wrapper before applying.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const PROJECT_GRID_WRAPPER: &str = "grid md:grid-cols-2 lg:grid-cols-3 gap-8";
const SKILLS_WRAPPER: &str = "max-w-4xl mx-auto space-y-8";
const CHIP_WRAPPER: &str = "flex flex-wrap gap-3 mt-8";

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*```(?:html)?\s*").expect("invalid pattern"));
static FENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```\s*$").expect("invalid pattern"));

static PROJECT_CARDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)(<section[^>]*>.*?<h2[^>]*>Featured Projects</h2>.*?)(<div class="card-hover[^>]*>.*?</div>)(.*?</section>)"#,
    )
    .expect("invalid pattern")
});

static SKILL_BARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)(<section[^>]*>.*?<h2[^>]*>Skills[^<]*</h2>.*?)(<div class="space-y-4">\s*<div class="flex justify-between[^>]*>.*?</div>\s*<div class="bg-gray-200[^>]*>.*?</div>\s*</div>)(.*?</section>)"#,
    )
    .expect("invalid pattern")
});

static CHIP_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\s*<span class="px-4 py-2 bg-gray-100[^>]*>[^<]*</span>\s*)+"#)
        .expect("invalid pattern")
});

static DUP_CONTAINERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)(<div class=['"]container[^>]*>)(?:\s*<div class=['"]container[^>]*>)+"#)
        .expect("invalid pattern")
});

static CLOSING_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:</div>){4,}").expect("invalid pattern"));

/// Repairs common layout defects in generated HTML.
///
/// Empty or whitespace-only input is returned unchanged. Applying the pass
/// twice yields the same output as applying it once.
pub fn repair_structure(html: &str) -> String {
    if html.trim().is_empty() {
        return html.to_string();
    }

    let mut out = html.trim().to_string();

    out = strip_markdown_fences(&out);
    out = wrap_project_cards(&out);
    out = wrap_skill_bars(&out);
    out = wrap_floating_chips(&out);
    out = collapse_duplicate_containers(&out);
    out = CLOSING_RUN.replace_all(&out, "</div></div>").into_owned();

    out.trim().to_string()
}

/// The model sometimes wraps the whole document in a fenced code block
/// despite instructions not to.
fn strip_markdown_fences(html: &str) -> String {
    let out = FENCE_OPEN.replace(html, "");
    FENCE_CLOSE.replace(&out, "").trim().to_string()
}

/// Wraps bare project cards inside a "Featured Projects" section in a
/// responsive grid container.
fn wrap_project_cards(html: &str) -> String {
    PROJECT_CARDS
        .replace_all(html, |caps: &Captures| {
            if caps[1].contains(PROJECT_GRID_WRAPPER) {
                return caps[0].to_string();
            }
            format!(
                "{}<div class='{PROJECT_GRID_WRAPPER}'>{}</div>{}",
                &caps[1], &caps[2], &caps[3]
            )
        })
        .into_owned()
}

/// Wraps bare skill-bar rows inside a Skills section in a vertical-stack
/// container.
fn wrap_skill_bars(html: &str) -> String {
    SKILL_BARS
        .replace_all(html, |caps: &Captures| {
            if caps[1].contains(SKILLS_WRAPPER) {
                return caps[0].to_string();
            }
            format!(
                "{}<div class='{SKILLS_WRAPPER}'>{}</div>{}",
                &caps[1], &caps[2], &caps[3]
            )
        })
        .into_owned()
}

/// Wraps contiguous runs of floating tag-chip spans in a flex-wrap container.
fn wrap_floating_chips(html: &str) -> String {
    let open_tag = format!("<div class='{CHIP_WRAPPER}'>");
    CHIP_RUN
        .replace_all(html, |caps: &Captures| {
            let m = caps.get(0).expect("whole match");
            let before = &html[..m.start()];
            if before.trim_end().ends_with(open_tag.as_str()) {
                return m.as_str().to_string();
            }
            format!("{open_tag}{}</div>", m.as_str())
        })
        .into_owned()
}

/// Collapses consecutive duplicate container openers produced by earlier
/// repairs or by the model itself.
fn collapse_duplicate_containers(html: &str) -> String {
    DUP_CONTAINERS
        .replace_all(html, |caps: &Captures| caps[1].to_string())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markdown_fences_and_whitespace() {
        let input = "```html\n<p>x</p>\n```";
        assert_eq!(repair_structure(input), "<p>x</p>");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let input = "```\n<section class=\"wrapper\">\n  <div class=\"card-hover\">Card</div>\n```";
        let out = repair_structure(input);
        assert!(out.starts_with("<section"));
        assert!(!out.contains("```"));
    }

    #[test]
    fn test_empty_input_passes_through() {
        assert_eq!(repair_structure(""), "");
        assert_eq!(repair_structure("   \n  "), "   \n  ");
    }

    #[test]
    fn test_wraps_orphaned_project_cards_in_grid() {
        let input = r#"<section><h2>Featured Projects</h2><div class="card-hover p-6">Project</div></section>"#;
        let out = repair_structure(input);
        assert!(out.contains(&format!("<div class='{PROJECT_GRID_WRAPPER}'>")));
        assert!(out.contains(r#"<div class="card-hover p-6">Project</div></div>"#));
    }

    #[test]
    fn test_wraps_orphaned_skill_bars() {
        let input = concat!(
            r#"<section><h2>Skills &amp; Tools</h2>"#,
            r#"<div class="space-y-4"> <div class="flex justify-between mb-1">Rust</div> "#,
            r#"<div class="bg-gray-200 rounded-full">bar</div> </div>"#,
            r#"</section>"#,
        );
        let out = repair_structure(input);
        assert!(out.contains(&format!("<div class='{SKILLS_WRAPPER}'>")));
    }

    #[test]
    fn test_wraps_floating_chips_preserving_order() {
        let input = concat!(
            r#"<span class="px-4 py-2 bg-gray-100 rounded">Rust</span>"#,
            r#"<span class="px-4 py-2 bg-gray-100 rounded">Axum</span>"#,
            r#"<span class="px-4 py-2 bg-gray-100 rounded">Tokio</span>"#,
        );
        let out = repair_structure(input);
        let wrapper_start = out
            .find(&format!("<div class='{CHIP_WRAPPER}'>"))
            .expect("wrapper present");
        let rust = out.find(">Rust<").expect("first chip");
        let axum = out.find(">Axum<").expect("second chip");
        let tokio = out.find(">Tokio<").expect("third chip");
        assert!(wrapper_start < rust && rust < axum && axum < tokio);
        // All three chips share one wrapper.
        assert_eq!(out.matches(CHIP_WRAPPER).count(), 1);
    }

    #[test]
    fn test_collapses_duplicate_closing_divs_to_safe_depth() {
        let input = "<div>content</div></div></div></div></div>";
        let out = repair_structure(input);
        assert!(out.ends_with("content</div></div>"));
    }

    #[test]
    fn test_three_closing_divs_untouched() {
        let input = "<div><div><div>x</div></div></div>";
        assert_eq!(repair_structure(input), input);
    }

    #[test]
    fn test_collapses_duplicate_container_wrappers() {
        let input = r#"<div class='container mx-auto'> <div class='container mx-auto'>x</div></div>"#;
        let out = repair_structure(input);
        assert_eq!(out.matches("class='container").count(), 1);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let inputs = [
            "```html\n<p>x</p>\n```",
            r#"<section><h2>Featured Projects</h2><div class="card-hover p-6">Project</div></section>"#,
            concat!(
                r#"<span class="px-4 py-2 bg-gray-100 rounded">A</span>"#,
                r#"<span class="px-4 py-2 bg-gray-100 rounded">B</span>"#,
            ),
            "<div>content</div></div></div></div></div>",
        ];
        for input in inputs {
            let once = repair_structure(input);
            let twice = repair_structure(&once);
            assert_eq!(once, twice, "repair not idempotent for: {input}");
        }
    }
}
