//! Generation Orchestrator — assembles prompt context, drives the chat
//! provider, and runs the HTML post-processing pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context as _;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::catalog::{EnhancementChoice, SectionPreference, SelectedComponent};
use crate::errors::AppError;
use crate::generation::reference::ReferenceFile;
use crate::generation::{prompts, reference, templates};
use crate::html;
use crate::images::UploadedImages;
use crate::llm_client::generate_document;
use crate::state::AppState;

/// Streaming stops once the document closes; providers otherwise keep
/// emitting past their output ceilings.
const STOP_MARKER: &str = "</html>";

const MAX_ATTEMPTS: usize = 2;
const ARTIFACT_FILENAME: &str = "generated_website.html";

/// Prompts that read like a personal-site request get the uploaded headshot
/// wired in even when the model ignored the placeholder contract.
const PORTFOLIO_KEYWORDS: &[&str] = &[
    "portfolio",
    "resume",
    "cv",
    "curriculum vitae",
    "about me",
    "personal website",
    "my profile",
    "professional profile",
    "my resume",
    "create resume",
];

static STOCK_IMG_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<img[^>]*src="https://images\.unsplash\.com/[^"]*"[^>]*>"#).expect("valid regex")
});

// ────────────────────────────────────────────────────────────────────────────
// Request / Outcome types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct GenerateRequest {
    pub prompt: String,
    pub selected_template: Option<String>,
    pub reference_url: Option<String>,
    pub style_preset: Option<String>,
    pub preferred_sections: Option<BTreeMap<String, SectionPreference>>,
    pub interactive_enhancements: Option<Vec<EnhancementChoice>>,
    pub profile_image: Option<ReferenceFile>,
    pub profile_image_url: Option<String>,
    pub reference_files: Vec<ReferenceFile>,
}

pub struct GenerateOutcome {
    pub file_path: PathBuf,
    pub content: String,
    pub component_blueprint: String,
    pub component_variants: BTreeMap<String, SelectedComponent>,
    pub preferred_sections: BTreeMap<String, SectionPreference>,
}

#[derive(Default)]
pub struct UpdateRequest {
    pub current_html: String,
    pub update_prompt: String,
    pub original_prompt: Option<String>,
    pub profile_image_data: Option<String>,
    pub style_preset: Option<String>,
    pub preferred_sections: Option<BTreeMap<String, SectionPreference>>,
}

pub struct UpdateOutcome {
    pub content: String,
    pub component_blueprint: String,
    pub component_variants: BTreeMap<String, SelectedComponent>,
    pub preferred_sections: BTreeMap<String, SectionPreference>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation flow
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_website(
    state: &AppState,
    request: GenerateRequest,
) -> Result<GenerateOutcome, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }

    // Intake uploads first: the profile image claims its label before
    // reference images are assigned positional ones.
    let mut uploads = UploadedImages::new();
    let mut profile_context = String::new();
    if let Some(image) = &request.profile_image {
        uploads.insert(
            "profile".to_string(),
            reference::data_uri(&image.filename, &image.bytes),
        );
        profile_context = "\n\nPROFILE IMAGE: User has uploaded a profile picture. \
            Use {{image: profile}} placeholder to include it in the design."
            .to_string();
    } else if let Some(url) = &request.profile_image_url {
        if url.starts_with("http://") || url.starts_with("https://") {
            uploads.insert("profile".to_string(), url.clone());
            profile_context = format!(
                "\n\nPROFILE IMAGE: User provided profile image URL: {url}. \
                Use {{image: profile}} placeholder to include it in the design."
            );
        } else {
            warn!("Ignoring non-http profile image URL");
        }
    }

    let mut reference_context = String::new();
    if let Some(url) = &request.reference_url {
        if let Some(design) = reference::fetch_website_design(url).await {
            reference_context.push_str("\n\nREFERENCE WEBSITE DESIGN:\n");
            reference_context.push_str(&design);
        }
    }
    if let Some(docs) = reference::process_reference_files(&request.reference_files) {
        reference_context.push_str("\n\nREFERENCE DOCUMENTS:\n");
        reference_context.push_str(&docs);
    }
    reference::collect_uploaded_images(&request.reference_files, &mut uploads);

    let template_name = request.selected_template.as_deref().unwrap_or("");
    let template_context = request
        .selected_template
        .as_deref()
        .and_then(|name| templates::load_template(&state.config.templates_dir, name))
        .map(|html| prompts::template_context(&html))
        .unwrap_or_default();

    let (style_context, style_hint) = request
        .style_preset
        .as_deref()
        .and_then(|key| state.catalog.build_style_context(key))
        .unwrap_or_default();

    let (component_variants, component_blueprint) = state.catalog.build_component_context(
        &request.prompt,
        template_name,
        request.preferred_sections.as_ref(),
    );

    let interactive_context = request
        .interactive_enhancements
        .as_deref()
        .map(|choices| state.catalog.build_interactive_context(choices))
        .unwrap_or_default();

    let mut prompt = prompts::website_prompt(&request.prompt, &template_context);
    prompt.push_str(&reference_context);
    prompt.push_str(&profile_context);
    for context in [&style_context, &interactive_context, &component_blueprint] {
        if !context.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(context);
        }
    }

    let mut generated = invoke_with_retry(state, &prompt).await?;

    if is_portfolio_request(&request.prompt) && uploads.contains_key("profile") {
        generated = inject_profile_placeholder(&generated);
    }

    let style_hint = (!style_hint.is_empty()).then_some(style_hint.as_str());
    let content = html::post_process(&generated, state.images.as_ref(), &uploads, style_hint).await;

    let file_path = std::env::temp_dir().join(ARTIFACT_FILENAME);
    std::fs::write(&file_path, &content).context("failed to write generated page artifact")?;
    info!("Generated page written to {}", file_path.display());

    Ok(GenerateOutcome {
        file_path,
        content,
        component_blueprint,
        component_variants,
        preferred_sections: request.preferred_sections.unwrap_or_default(),
    })
}

pub async fn update_website(
    state: &AppState,
    request: UpdateRequest,
) -> Result<UpdateOutcome, AppError> {
    if request.current_html.trim().is_empty() || request.update_prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "Current HTML and update prompt are required".to_string(),
        ));
    }

    let mut uploads = UploadedImages::new();
    if let Some(data) = &request.profile_image_data {
        if !data.is_empty() {
            uploads.insert("profile".to_string(), data.clone());
        }
    }

    let (style_context, style_hint) = request
        .style_preset
        .as_deref()
        .and_then(|key| state.catalog.build_style_context(key))
        .unwrap_or_default();

    // Section choices follow the page's original intent when known.
    let component_source = request
        .original_prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(&request.update_prompt);
    let (component_variants, component_blueprint) = state.catalog.build_component_context(
        component_source,
        "",
        request.preferred_sections.as_ref(),
    );

    let mut prompt = prompts::update_prompt(&request.current_html, &request.update_prompt);
    for context in [&style_context, &component_blueprint] {
        if !context.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(context);
        }
    }

    let updated = generate_document(state.llm.as_ref(), &prompt, STOP_MARKER)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    if updated.trim().is_empty() {
        return Err(AppError::Llm("model returned empty content".to_string()));
    }

    let style_hint = (!style_hint.is_empty()).then_some(style_hint.as_str());
    let content = html::post_process(&updated, state.images.as_ref(), &uploads, style_hint).await;

    Ok(UpdateOutcome {
        content,
        component_blueprint,
        component_variants,
        preferred_sections: request.preferred_sections.unwrap_or_default(),
    })
}

/// One retry on empty or failed output; providers occasionally return an
/// empty body when the prompt brushes their output ceiling.
async fn invoke_with_retry(state: &AppState, prompt: &str) -> Result<String, AppError> {
    let mut last_error = None;
    for attempt in 1..=MAX_ATTEMPTS {
        match generate_document(state.llm.as_ref(), prompt, STOP_MARKER).await {
            Ok(html) if !html.trim().is_empty() => return Ok(html),
            Ok(_) => warn!("Attempt {attempt}/{MAX_ATTEMPTS} returned empty content"),
            Err(e) => {
                warn!("Attempt {attempt}/{MAX_ATTEMPTS} failed: {e}");
                last_error = Some(e);
            }
        }
    }
    Err(match last_error {
        Some(e) => AppError::Llm(e.to_string()),
        None => AppError::Llm(
            "model returned empty content; try a shorter prompt".to_string(),
        ),
    })
}

fn is_portfolio_request(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    PORTFOLIO_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Rewrites stock-photo img tags to the profile placeholder, unless the
/// document already carries one.
fn inject_profile_placeholder(html: &str) -> String {
    if html.contains("{{image: profile}}") || html.contains("{{image:profile}}") {
        return html.to_string();
    }
    STOCK_IMG_TAG
        .replace_all(html, r#"<img src="{{image: profile}}" alt="profile">"#)
        .into_owned()
}
