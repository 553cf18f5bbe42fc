//! Axum route handlers for the generation API.

use axum::{
    extract::{Multipart, State},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::generation::orchestrator::{self, GenerateRequest, UpdateRequest};
use crate::generation::reference::ReferenceFile;
use crate::state::AppState;

/// POST /generate
///
/// Multipart form: `prompt` (required), plus optional `selected_template`,
/// `reference_url`, `style_preset`, `preferred_sections` (JSON),
/// `interactive_enhancements` (JSON), `profile_image` or `profile_image_url`,
/// and repeated `reference_files` uploads.
pub async fn handle_generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut request = GenerateRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "prompt" => request.prompt = field_text(field).await?,
            "selected_template" => request.selected_template = non_empty(field_text(field).await?),
            "reference_url" => request.reference_url = non_empty(field_text(field).await?),
            "style_preset" => request.style_preset = non_empty(field_text(field).await?),
            "profile_image_url" => request.profile_image_url = non_empty(field_text(field).await?),
            "preferred_sections" => {
                request.preferred_sections = parse_json_field(&field_text(field).await?, &name)
            }
            "interactive_enhancements" => {
                request.interactive_enhancements = parse_json_field(&field_text(field).await?, &name)
            }
            "profile_image" => {
                if let Some(file) = field_file(field).await? {
                    request.profile_image = Some(file);
                }
            }
            "reference_files" => {
                if let Some(file) = field_file(field).await? {
                    request.reference_files.push(file);
                }
            }
            other => warn!("Ignoring unknown form field '{other}'"),
        }
    }

    let outcome = orchestrator::generate_website(&state, request).await?;

    Ok(Json(json!({
        "success": true,
        "file_path": outcome.file_path.display().to_string(),
        "content": outcome.content,
        "component_blueprint": outcome.component_blueprint,
        "component_variants": outcome.component_variants,
        "preferred_sections": outcome.preferred_sections,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    current_html: String,
    #[serde(default)]
    update_prompt: String,
    #[serde(default)]
    original_prompt: String,
    #[serde(default)]
    profile_image_data: String,
    #[serde(default)]
    style_preset: String,
    #[serde(default)]
    preferred_sections: String,
}

/// POST /update
///
/// Url-encoded form carrying the page being edited plus the change request.
pub async fn handle_update(
    State(state): State<AppState>,
    Form(form): Form<UpdateForm>,
) -> Result<Json<Value>, AppError> {
    let request = UpdateRequest {
        current_html: form.current_html,
        update_prompt: form.update_prompt,
        original_prompt: non_empty(form.original_prompt),
        profile_image_data: non_empty(form.profile_image_data),
        style_preset: non_empty(form.style_preset),
        preferred_sections: parse_json_field(&form.preferred_sections, "preferred_sections"),
    };

    let outcome = orchestrator::update_website(&state, request).await?;

    Ok(Json(json!({
        "success": true,
        "content": outcome.content,
        "component_blueprint": outcome.component_blueprint,
        "component_variants": outcome.component_variants,
        "preferred_sections": outcome.preferred_sections,
    })))
}

// ────────────────────────────────────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────────────────────────────────────

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))
}

async fn field_file(
    field: axum::extract::multipart::Field<'_>,
) -> Result<Option<ReferenceFile>, AppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
    if filename.is_empty() || bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ReferenceFile {
        filename,
        bytes: bytes.to_vec(),
    }))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Optional JSON-carrying form fields are lenient: malformed payloads are
/// logged and ignored rather than failing the whole request.
fn parse_json_field<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Invalid {what} payload, ignoring: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnhancementChoice, SectionPreference};
    use std::collections::BTreeMap;

    #[test]
    fn test_non_empty_filters_whitespace() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" x ".to_string()), Some("x".to_string()));
    }

    #[test]
    fn test_invalid_section_preferences_are_ignored() {
        let parsed: Option<BTreeMap<String, SectionPreference>> =
            parse_json_field("{not json", "preferred_sections");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_section_preferences_parse() {
        let parsed: Option<BTreeMap<String, SectionPreference>> = parse_json_field(
            r#"{"pricing": {"include": false}, "hero": {"variant": "hero_split_image"}}"#,
            "preferred_sections",
        );
        let parsed = parsed.expect("valid payload");
        assert!(!parsed["pricing"].include);
        assert_eq!(parsed["hero"].variant.as_deref(), Some("hero_split_image"));
    }

    #[test]
    fn test_enhancement_choices_parse_mixed_shapes() {
        let parsed: Option<Vec<EnhancementChoice>> = parse_json_field(
            r#"["animated_counters", {"id": "parallax_timeline"}]"#,
            "interactive_enhancements",
        );
        assert_eq!(parsed.expect("valid payload").len(), 2);
    }
}
