//! Design catalogs: style presets, the component library, and the
//! interactive-enhancement library.
//!
//! Each catalog loads once at startup from an optional JSON file shared with
//! the frontend, falling back to built-in defaults when the file is absent
//! or invalid. After load the catalog is read-only.

mod defaults;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context as _, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylePreset {
    pub label: String,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub mood: Vec<String>,
    #[serde(default)]
    pub ui_accents: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentVariant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub content_focus: Vec<String>,
    #[serde(default)]
    pub visual_notes: String,
    #[serde(default)]
    pub best_for: Vec<String>,
    #[serde(default)]
    pub css_primitives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSection {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variants: Vec<ComponentVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enhancement {
    pub label: String,
    pub purpose: String,
    pub placement: String,
    pub implementation: String,
}

/// A chosen variant for one page section, echoed back to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedComponent {
    pub section_label: String,
    pub section_description: String,
    pub variant: ComponentVariant,
}

/// Per-section user preference submitted with a generation request and
/// echoed back in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPreference {
    #[serde(default = "default_true")]
    pub include: bool,
    #[serde(default)]
    pub variant: Option<String>,
}

fn default_true() -> bool {
    true
}

/// An interactive-enhancement selection: the frontend sends either bare ids
/// or objects carrying an `id` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnhancementChoice {
    Id(String),
    Object {
        #[serde(default)]
        id: Option<String>,
    },
}

impl EnhancementChoice {
    fn id(&self) -> Option<&str> {
        match self {
            EnhancementChoice::Id(id) => Some(id),
            EnhancementChoice::Object { id } => id.as_deref(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

pub struct Catalog {
    pub style_presets: BTreeMap<String, StylePreset>,
    pub components: BTreeMap<String, ComponentSection>,
    pub enhancements: BTreeMap<String, Enhancement>,
}

impl Catalog {
    pub fn load(config: &Config) -> Result<Self> {
        Ok(Self {
            style_presets: load_or_default(
                &config.style_presets_path,
                defaults::STYLE_PRESETS_JSON,
                "style presets",
            )?,
            components: load_or_default(
                &config.component_library_path,
                defaults::COMPONENT_LIBRARY_JSON,
                "component library",
            )?,
            enhancements: serde_json::from_str(defaults::INTERACTIVE_ENHANCEMENTS_JSON)
                .context("built-in enhancement library is invalid")?,
        })
    }

    #[cfg(test)]
    pub fn builtin() -> Self {
        let config = Config {
            llm_provider: String::new(),
            google_api_key: None,
            gemini_model: String::new(),
            openai_api_key: None,
            openai_model: String::new(),
            anthropic_api_key: None,
            anthropic_model: String::new(),
            groq_api_key: None,
            groq_model: String::new(),
            ollama_url: String::new(),
            ollama_model: String::new(),
            hf_token: None,
            unsplash_access_key: None,
            style_presets_path: "/nonexistent/style_presets.json".to_string(),
            component_library_path: "/nonexistent/component_library.json".to_string(),
            templates_dir: "templates".to_string(),
            port: 0,
            rust_log: String::new(),
        };
        Self::load(&config).expect("built-in catalogs must parse")
    }

    /// Returns the prompt context and image-style hint for a style preset,
    /// or `None` for an unknown key.
    pub fn build_style_context(&self, style_key: &str) -> Option<(String, String)> {
        let preset = self.style_presets.get(style_key)?;

        let heading_font = preset.fonts.first().map(String::as_str).unwrap_or("sans-serif");
        let body_font = preset.fonts.get(1).map(String::as_str).unwrap_or("sans-serif");

        let context = format!(
            "\nDESIGN STYLE GUIDANCE:\n\
            - Style Name: {}\n\
            - Palette: {}\n\
            - Typography: Heading - {heading_font}, Body - {body_font}\n\
            - Mood: {}\n\
            - UI Accents: {}\n\
            - Additional Instructions: {}\n\
            Ensure every section, color choice, component spacing, and interaction embodies this style consistently.\n",
            preset.label,
            preset.palette.join(" / "),
            preset.mood.join(", "),
            preset.ui_accents,
            preset.instructions,
        );
        Some((context, preset.image_prompt.clone()))
    }

    /// Selects the best component variant per section for the inferred tags.
    pub fn select_component_variants(
        &self,
        tags: &BTreeSet<String>,
    ) -> BTreeMap<String, SelectedComponent> {
        let mut selections = BTreeMap::new();
        for (section_key, section) in &self.components {
            let chosen = section
                .variants
                .iter()
                .find(|v| v.best_for.iter().any(|tag| tags.contains(tag)))
                .or_else(|| section.variants.first());
            if let Some(variant) = chosen {
                selections.insert(
                    section_key.clone(),
                    SelectedComponent {
                        section_label: section.label.clone(),
                        section_description: section.description.clone(),
                        variant: variant.clone(),
                    },
                );
            }
        }
        selections
    }

    /// Returns selected component variants (honoring user preferences) and
    /// the blueprint text appended to the generation prompt.
    pub fn build_component_context(
        &self,
        user_prompt: &str,
        template_name: &str,
        preferred: Option<&BTreeMap<String, SectionPreference>>,
    ) -> (BTreeMap<String, SelectedComponent>, String) {
        let tags = infer_project_tags(user_prompt, template_name);
        let mut selections = self.select_component_variants(&tags);

        if let Some(preferred) = preferred {
            for (section_key, prefs) in preferred {
                let Some(section) = self.components.get(section_key) else {
                    continue;
                };
                if !prefs.include {
                    selections.remove(section_key);
                    continue;
                }
                let variant = prefs
                    .variant
                    .as_deref()
                    .and_then(|id| section.variants.iter().find(|v| v.id == id))
                    .or_else(|| section.variants.first());
                if let Some(variant) = variant {
                    selections.insert(
                        section_key.clone(),
                        SelectedComponent {
                            section_label: section.label.clone(),
                            section_description: section.description.clone(),
                            variant: variant.clone(),
                        },
                    );
                }
            }
        }

        if selections.is_empty() {
            return (selections, String::new());
        }

        let mut lines = vec![
            "COMPONENT BLUEPRINT:".to_string(),
            "Assemble the page using these curated section patterns for consistency.".to_string(),
        ];
        for selected in selections.values() {
            let variant = &selected.variant;
            lines.push(format!(
                "- {} -> {}: {}",
                selected.section_label, variant.name, variant.layout
            ));
            if !variant.content_focus.is_empty() {
                lines.push(format!("  Content focus: {}", variant.content_focus.join(", ")));
            }
            if !variant.visual_notes.is_empty() {
                lines.push(format!("  Visual notes: {}", variant.visual_notes));
            }
            if !variant.css_primitives.is_empty() {
                lines.push(format!("  CSS primitives: {}", variant.css_primitives.join(", ")));
            }
        }
        let blueprint = lines.join("\n");
        (selections, blueprint)
    }

    /// Returns textual guidance for the selected interactive enhancements,
    /// or an empty string when nothing valid was selected.
    pub fn build_interactive_context(&self, selected: &[EnhancementChoice]) -> String {
        let lines: Vec<String> = selected
            .iter()
            .filter_map(EnhancementChoice::id)
            .filter_map(|id| self.enhancements.get(id))
            .map(|e| {
                format!(
                    "- {}: {} Place it in {}. Implementation notes: {}. \
                    Include a short caption or subheading that explains the effect's benefit \
                    so users understand the premium feel.",
                    e.label, e.purpose, e.placement, e.implementation
                )
            })
            .collect();

        if lines.is_empty() {
            return String::new();
        }

        format!(
            "INTERACTIVE ENHANCEMENT BLUEPRINT:\n\
            Integrate the following micro-interactions. Each chosen effect must be implemented \
            in HTML/CSS (with minimal JS if required), kept lightweight, and paired with a brief \
            on-page explanation of why it matters.\n{}\n\
            Ensure animations respect prefers-reduced-motion by providing graceful fallbacks.",
            lines.join("\n")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tag inference
// ────────────────────────────────────────────────────────────────────────────

const BUSINESS_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("saas", &["saas", "software", "platform", "startup", "app", "tech"]),
    ("agency", &["agency", "studio", "consult", "freelance", "creative"]),
    ("services", &["service", "salon", "spa", "therapy", "coaching"]),
    ("product", &["product", "ecommerce", "shop", "store", "retail"]),
    ("portfolio", &["portfolio", "photography", "designer", "artist"]),
    ("education", &["school", "academy", "bootcamp", "education", "course"]),
    ("case-study", &["case study", "success story"]),
];

/// Infers high-level project tags from the user prompt and template name.
pub fn infer_project_tags(text: &str, template_name: &str) -> BTreeSet<String> {
    let haystack = format!("{text} {template_name}").to_lowercase();
    let mut tags: BTreeSet<String> = BUSINESS_TYPE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(tag, _)| tag.to_string())
        .collect();
    if tags.is_empty() {
        tags.insert("general".to_string());
    }
    tags
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

fn load_or_default<T: DeserializeOwned>(
    path: &str,
    fallback_json: &str,
    what: &str,
) -> Result<BTreeMap<String, T>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<BTreeMap<String, T>>(&raw) {
            Ok(parsed) if !parsed.is_empty() => {
                info!("Loaded {what} from {path} ({} entries)", parsed.len());
                return Ok(parsed);
            }
            Ok(_) => warn!("{path} is empty; falling back to built-in {what}"),
            Err(e) => warn!("Failed to parse {path}: {e}; falling back to built-in {what}"),
        },
        Err(_) => info!("{path} not found; using built-in {what}"),
    }
    serde_json::from_str(fallback_json).with_context(|| format!("built-in {what} is invalid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_parse() {
        let catalog = Catalog::builtin();
        assert!(catalog.style_presets.contains_key("brutalist"));
        assert!(catalog.components.contains_key("hero"));
        assert!(catalog.enhancements.contains_key("animated_counters"));
    }

    #[test]
    fn test_style_context_names_palette_and_fonts() {
        let catalog = Catalog::builtin();
        let (context, hint) = catalog.build_style_context("editorial").expect("known preset");
        assert!(context.contains("Editorial Luxe"));
        assert!(context.contains("Playfair Display"));
        assert!(!hint.is_empty());
    }

    #[test]
    fn test_unknown_style_key_yields_none() {
        assert!(Catalog::builtin().build_style_context("vaporwave").is_none());
    }

    #[test]
    fn test_infer_tags_matches_keywords() {
        let tags = infer_project_tags("a portfolio for a freelance designer", "");
        assert!(tags.contains("portfolio"));
        assert!(tags.contains("agency"));
    }

    #[test]
    fn test_infer_tags_defaults_to_general() {
        let tags = infer_project_tags("a website for my cat", "");
        assert_eq!(tags.len(), 1);
        assert!(tags.contains("general"));
    }

    #[test]
    fn test_component_selection_prefers_matching_tags() {
        let catalog = Catalog::builtin();
        let tags: BTreeSet<String> = ["saas".to_string()].into_iter().collect();
        let selections = catalog.select_component_variants(&tags);
        assert!(selections.contains_key("pricing"));
    }

    #[test]
    fn test_preferred_sections_can_exclude() {
        let catalog = Catalog::builtin();
        let mut preferred = BTreeMap::new();
        preferred.insert(
            "pricing".to_string(),
            SectionPreference {
                include: false,
                variant: None,
            },
        );
        let (selections, blueprint) =
            catalog.build_component_context("a saas platform", "", Some(&preferred));
        assert!(!selections.contains_key("pricing"));
        assert!(!blueprint.contains("Pricing"));
        assert!(blueprint.starts_with("COMPONENT BLUEPRINT:"));
    }

    #[test]
    fn test_interactive_context_accepts_ids_and_objects() {
        let catalog = Catalog::builtin();
        let choices: Vec<EnhancementChoice> = serde_json::from_str(
            r#"["animated_counters", {"id": "testimonial_carousel"}, {"id": "unknown_effect"}]"#,
        )
        .expect("choices parse");
        let context = catalog.build_interactive_context(&choices);
        assert!(context.contains("Animated Counters"));
        assert!(context.contains("Testimonial Carousel"));
        assert!(!context.contains("unknown_effect"));
    }

    #[test]
    fn test_empty_enhancement_selection_yields_empty_context() {
        assert!(Catalog::builtin().build_interactive_context(&[]).is_empty());
    }
}
