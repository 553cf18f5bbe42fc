//! HTML post-processing pipeline for raw LLM output.
//!
//! Fixed stage order: normalize malformed `<img>` artifacts back into
//! `{{image: label}}` placeholders → substitute placeholders with resolved
//! image sources → structural repair. Every stage also works standalone
//! (the update flow re-runs them on model-edited documents).

pub mod normalize;
pub mod repair;
pub mod substitute;

use crate::images::{LabelResolver, UploadedImages};

/// Runs the full pipeline on raw LLM output.
///
/// Empty or whitespace-only input short-circuits and is returned unchanged —
/// the caller is responsible for never invoking this on failed generations.
pub async fn post_process(
    html: &str,
    resolver: &dyn LabelResolver,
    uploads: &UploadedImages,
    style_hint: Option<&str>,
) -> String {
    if html.trim().is_empty() {
        return html.to_string();
    }
    let cleaned = normalize::normalize_img_tags(html);
    let resolved = substitute::substitute_placeholders(&cleaned, resolver, uploads, style_hint).await;
    repair::repair_structure(&resolved)
}
