//! Reference inputs: design cues scraped from an existing website, and
//! uploaded reference documents (text, PDF, images) turned into prompt
//! context and uploadable image sources.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::images::UploadedImages;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-file character caps keep the assembled prompt within context budgets.
const TEXT_FILE_CAP: usize = 2000;
const PDF_TEXT_CAP: usize = 3000;
const IMAGE_SAMPLE_CAP: usize = 500;
const HTML_SAMPLE_CAP: usize = 2000;

/// One uploaded reference file, already read into memory.
#[derive(Debug, Clone)]
pub struct ReferenceFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ReferenceFile {
    fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    fn is_image(&self) -> bool {
        matches!(self.extension().as_str(), "jpg" | "jpeg" | "png" | "gif")
    }
}

fn truncate_chars(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Reference website design
// ────────────────────────────────────────────────────────────────────────────

static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("valid regex"));
static META_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+name="description"\s+content="([^"]*)""#).expect("valid regex")
});
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("valid regex"));
static COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[0-9a-fA-F]{6}|rgb\([^)]+\)").expect("valid regex"));
static FONT_FAMILY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"font-family:\s*([^;,}]+)").expect("valid regex"));
static HEADER_OR_NAV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<header|<nav").expect("valid regex"));
static FOOTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<footer").expect("valid regex"));
static HERO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)hero|banner|jumbotron").expect("valid regex"));

/// Fetches a reference website and distills its design into prompt context.
/// Any failure is logged and reported as "no reference available".
pub async fn fetch_website_design(url: &str) -> Option<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .ok()?;
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(html) => Some(summarize_design(url, &html)),
            Err(e) => {
                warn!("Failed to read reference website body: {e}");
                None
            }
        },
        Ok(response) => {
            warn!("Reference website returned status {}", response.status());
            None
        }
        Err(e) => {
            warn!("Failed to fetch reference website: {e}");
            None
        }
    }
}

/// Extracts title, description, palette, fonts, layout landmarks, and a raw
/// structure sample from reference HTML.
fn summarize_design(url: &str, html: &str) -> String {
    let mut info = format!("REFERENCE WEBSITE URL: {url}\n\n");

    if let Some(caps) = TITLE.captures(html) {
        info.push_str(&format!("Website Title: {}\n", &caps[1]));
    }
    if let Some(caps) = META_DESCRIPTION.captures(html) {
        info.push_str(&format!("Description: {}\n", &caps[1]));
    }

    if let Some(caps) = STYLE_BLOCK.captures(html) {
        let css = truncate_chars(&caps[1], 1000);
        let colors = dedup_matches(&COLOR, &css, 5);
        if !colors.is_empty() {
            info.push_str(&format!("Color Scheme: {}\n", colors.join(", ")));
        }
    }

    let fonts: Vec<String> = FONT_FAMILY
        .captures_iter(html)
        .take(3)
        .map(|caps| caps[1].trim().to_string())
        .collect();
    if !fonts.is_empty() {
        info.push_str(&format!("Fonts Used: {}\n", fonts.join(", ")));
    }

    let mut elements = Vec::new();
    if HEADER_OR_NAV.is_match(html) {
        elements.push("Header/Navigation");
    }
    if HERO.is_match(html) {
        elements.push("Hero Section");
    }
    if FOOTER.is_match(html) {
        elements.push("Footer");
    }
    info.push_str("\nLayout Elements: ");
    if elements.is_empty() {
        info.push_str("Standard layout");
    } else {
        info.push_str(&elements.join(", "));
    }

    info.push_str(&format!(
        "\n\nHTML Structure Sample (first {HTML_SAMPLE_CAP} chars):\n{}\n",
        truncate_chars(html, HTML_SAMPLE_CAP)
    ));
    info.push_str(
        "\n\nINSTRUCTIONS: Analyze this website's design, layout, color scheme, typography, \
        and structure. Create a similar design for the new website with the same professional \
        appearance and layout style.",
    );
    info
}

fn dedup_matches(regex: &Regex, haystack: &str, cap: usize) -> Vec<String> {
    let mut seen = Vec::new();
    for m in regex.find_iter(haystack) {
        let text = m.as_str().to_string();
        if !seen.contains(&text) {
            seen.push(text);
            if seen.len() == cap {
                break;
            }
        }
    }
    seen
}

// ────────────────────────────────────────────────────────────────────────────
// Reference documents
// ────────────────────────────────────────────────────────────────────────────

/// Converts uploaded reference files into a prompt-context block. Returns
/// `None` when nothing usable was uploaded.
pub fn process_reference_files(files: &[ReferenceFile]) -> Option<String> {
    let mut sections = Vec::new();

    for (idx, file) in files.iter().enumerate() {
        let idx = idx + 1;
        if file.filename.is_empty() || file.bytes.is_empty() {
            continue;
        }
        let filename = &file.filename;

        match file.extension().as_str() {
            "txt" | "md" => {
                let content = String::from_utf8_lossy(&file.bytes);
                sections.push(format!(
                    "[File {idx}: {filename}]\n{}",
                    truncate_chars(&content, TEXT_FILE_CAP)
                ));
            }
            "pdf" => match pdf_extract::extract_text_from_mem(&file.bytes) {
                Ok(text) if !text.trim().is_empty() => {
                    let text = truncate_chars(text.split_whitespace().collect::<Vec<_>>().join(" ").as_str(), PDF_TEXT_CAP);
                    sections.push(format!(
                        "[File {idx}: PDF '{filename}']\nRESUME/DOCUMENT CONTENT:\n{text}"
                    ));
                }
                Ok(_) => sections.push(pdf_fallback_note(idx, filename)),
                Err(e) => {
                    warn!("PDF extraction failed for '{filename}': {e}");
                    sections.push(pdf_fallback_note(idx, filename));
                }
            },
            "jpg" | "jpeg" | "png" | "gif" => {
                let sample = truncate_chars(&BASE64.encode(&file.bytes), IMAGE_SAMPLE_CAP);
                sections.push(format!(
                    "[File {idx}: Image '{filename}' - {} bytes]\nImage data (base64): {sample}...\n\
                    Use this profile/product image in the website design. Include it as a visual element.",
                    file.bytes.len()
                ));
            }
            "doc" | "docx" => sections.push(format!(
                "[File {idx}: Word document '{filename}'] - Document uploaded. \
                Please describe its content in the prompt."
            )),
            _ => sections.push(format!(
                "[File {idx}: '{filename}'] - File uploaded. Please describe its content in the prompt."
            )),
        }
    }

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n"))
    }
}

fn pdf_fallback_note(idx: usize, filename: &str) -> String {
    format!(
        "[File {idx}: PDF '{filename}'] - Resume/document uploaded. Please describe key details \
        (name, email, phone, experience, skills) in the prompt."
    )
}

/// Builds a data URI for an uploaded image file.
pub fn data_uri(filename: &str, bytes: &[u8]) -> String {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        other => format!("image/{other}"),
    };
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Registers uploaded reference images into the label map. The first image
/// becomes "profile" unless that label is already taken; the rest get
/// positional "image-N" labels.
pub fn collect_uploaded_images(files: &[ReferenceFile], uploads: &mut UploadedImages) {
    for (idx, file) in files.iter().enumerate() {
        let idx = idx + 1;
        if file.filename.is_empty() || file.bytes.is_empty() || !file.is_image() {
            continue;
        }
        let label = if idx == 1 && !uploads.contains_key("profile") {
            "profile".to_string()
        } else {
            format!("image-{idx}")
        };
        uploads.insert(label, data_uri(&file.filename, &file.bytes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, bytes: &[u8]) -> ReferenceFile {
        ReferenceFile {
            filename: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_summarize_design_extracts_title_colors_and_landmarks() {
        let html = r#"<html><head><title>Acme Bakery</title>
            <meta name="description" content="Fresh bread daily">
            <style>body { color: #112233; background: rgb(250, 250, 250); font-family: Lato, sans-serif; }</style>
            </head><body><nav>menu</nav><div class="hero">big</div><footer>end</footer></body></html>"#;
        let info = summarize_design("https://acme.example", html);
        assert!(info.contains("REFERENCE WEBSITE URL: https://acme.example"));
        assert!(info.contains("Website Title: Acme Bakery"));
        assert!(info.contains("Description: Fresh bread daily"));
        assert!(info.contains("#112233"));
        assert!(info.contains("Fonts Used: Lato"));
        assert!(info.contains("Header/Navigation, Hero Section, Footer"));
    }

    #[test]
    fn test_summarize_design_defaults_layout_when_bare() {
        let info = summarize_design("https://x.example", "<html><body>hi</body></html>");
        assert!(info.contains("Layout Elements: Standard layout"));
    }

    #[test]
    fn test_text_files_are_capped() {
        let long = "a".repeat(5000);
        let context = process_reference_files(&[file("notes.txt", long.as_bytes())])
            .expect("context produced");
        assert!(context.contains("[File 1: notes.txt]"));
        assert!(context.contains(&"a".repeat(2000)));
        assert!(!context.contains(&"a".repeat(2001)));
    }

    #[test]
    fn test_empty_and_nameless_files_are_skipped() {
        assert!(process_reference_files(&[]).is_none());
        assert!(process_reference_files(&[file("", b"data"), file("x.txt", b"")]).is_none());
    }

    #[test]
    fn test_unknown_extension_gets_describe_note() {
        let context =
            process_reference_files(&[file("data.bin", b"\x00\x01")]).expect("context produced");
        assert!(context.contains("[File 1: 'data.bin'] - File uploaded."));
    }

    #[test]
    fn test_data_uri_maps_jpg_to_jpeg() {
        let uri = data_uri("me.jpg", b"abc");
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert_eq!(data_uri("logo.png", b"abc"), format!("data:image/png;base64,{}", "YWJj"));
    }

    #[test]
    fn test_first_image_becomes_profile() {
        let mut uploads = UploadedImages::new();
        collect_uploaded_images(
            &[file("me.png", b"head"), file("shop.jpg", b"front")],
            &mut uploads,
        );
        assert!(uploads["profile"].starts_with("data:image/png;base64,"));
        assert!(uploads["image-2"].starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_existing_profile_upload_is_not_overwritten() {
        let mut uploads = UploadedImages::new();
        uploads.insert("profile".to_string(), "data:image/png;base64,KEEP".to_string());
        collect_uploaded_images(&[file("extra.png", b"pic")], &mut uploads);
        assert_eq!(uploads["profile"], "data:image/png;base64,KEEP");
        assert!(uploads.contains_key("image-1"));
    }

    #[test]
    fn test_non_image_files_do_not_claim_labels() {
        let mut uploads = UploadedImages::new();
        collect_uploaded_images(
            &[file("resume.pdf", b"%PDF"), file("me.png", b"pic")],
            &mut uploads,
        );
        assert!(!uploads.contains_key("profile"));
        assert!(uploads.contains_key("image-2"));
    }
}
