//! Prompt templates for page generation and incremental updates.
//!
//! Templates use `{token}` markers filled via `.replace()`. The literal
//! `{{image: label}}` sequences are part of the output contract the model is
//! instructed to follow; they are not substitution tokens.

const WEBSITE_PROMPT_TEMPLATE: &str = r#"
Create a single HTML page based on this description: {user_prompt}

{template_context}

CONTEXT-AWARE DESIGN GUIDANCE:
Analyze the request and apply appropriate design:

FOR PROFESSIONAL/RESUME WEBSITES:
- Clean, minimal design with professional colors (navy, gray, white)
- Sans-serif fonts (Roboto, Inter, Open Sans)
- If a profile photo is uploaded: Use it prominently in hero or sidebar
- Include sections: About, Skills, Experience, Education, Contact
- Use {{image: profile}} for the uploaded profile photo
- Use {{image: hero-background}} for professional backgrounds

FOR RESTAURANT/FOOD BUSINESSES:
- Warm, inviting colors (orange, brown, cream, gold)
- If a menu image/PDF is uploaded: Reference it for food styling
- If restaurant photos are uploaded: Use them in gallery sections
- Use {{image: hero-banner}}, {{image: food-dish}}, {{image: interior}}, {{image: ambiance}}
- Do NOT use profile photos - use food/restaurant imagery instead

FOR E-COMMERCE/PRODUCT WEBSITES:
- If product images are uploaded: Use {{image: product}} prominently
- If logo is uploaded: Use {{image: logo}} in header
- Product-focused layouts with clear CTAs
- Use {{image: product-showcase}}, {{image: product-detail}}, {{image: feature}}

FOR CREATIVE PORTFOLIOS:
- Bold, modern design with vibrant colors
- If portfolio images/work samples are uploaded: Use them in showcase sections
- Use {{image: portfolio-item-1}}, {{image: portfolio-item-2}}, etc.
- Do NOT use profile photos unless specifically for "About" section

FOR SERVICE BUSINESSES (Salon, Barber, Spa, etc.):
- If service images are uploaded: Use them to showcase services
- If before/after images: Use {{image: before-after}}
- If team photos: Use {{image: team}}, {{image: staff}}
- Use {{image: service-1}}, {{image: service-2}}, {{image: interior}}

INTELLIGENT IMAGE HANDLING - CRITICAL:
1. IMAGE LABELS MUST MATCH CONTEXT:
   - For FARM SHOP: Use labels like {{image: farm-produce}}, {{image: fresh-vegetables}}, {{image: farm-stand}}, {{image: organic-products}}, {{image: farmers-market}}
   - For RESTAURANT: Use {{image: food-dish}}, {{image: restaurant-interior}}, {{image: chef}}, {{image: dining-ambiance}}
   - For SALON: Use {{image: salon-interior}}, {{image: haircut-style}}, {{image: beauty-treatment}}, {{image: salon-chair}}
   - For RETAIL: Use {{image: store-front}}, {{image: product-display}}, {{image: shopping-experience}}
   - For PROFESSIONAL: Use {{image: profile}}, {{image: office}}, {{image: team}}, {{image: workspace}}

2. UPLOADED IMAGES:
   - First uploaded image is available as {{image: profile}}
   - Additional images available as {{image: image-2}}, {{image: image-3}}, etc.
   - ALWAYS use uploaded images when available
   - Use uploaded images by their labels - they will be embedded directly

3. IMAGE PLACEHOLDER NAMING RULES:
   - {{image: profile}} - For personal/professional headshots (FIRST UPLOADED IMAGE)
   - {{image: product}} - For product/e-commerce items
   - {{image: hero-banner}} - For main hero sections
   - {{image: food-dish}}, {{image: restaurant-interior}} - For food businesses
   - {{image: portfolio-item-N}} - For portfolio showcases
   - {{image: service-1}}, {{image: service-2}} - For service businesses
   - {{image: image-2}}, {{image: image-3}} - For additional uploaded images
   - **Use SPECIFIC, CONTEXT-RELEVANT labels that match the business type**
   - **NEVER use generic labels like "nature" or "landscape" - be specific to the business**

IMPORTANT - USE PROVIDED DATA:
- If a resume/document was uploaded, MUST use the actual data provided
- Do NOT make up or hallucinate contact information, experience, or details
- Use ONLY the information from the uploaded files
- If specific details are missing, leave them blank or use placeholder text

CRITICAL RULES - MUST FOLLOW EXACTLY:
1. Output ONLY valid HTML (no explanations or markdown).
2. Include CSS in <style> tags and minimal JavaScript in <script> tags.
3. **NEVER use <img src="..."> with actual URLs**
4. **For EVERY image, use EXACTLY this format: {{image: descriptive-label}}**
   - Example: {{image: profile}}, {{image: hero-banner}}, {{image: food-dish}}
   - Replace the entire <img> tag with just the placeholder
   - WRONG: <img src="https://...">
   - CORRECT: {{image: profile}}
5. **IMAGE LABELS MUST BE CONTEXT-SPECIFIC:**
   - Read the user description carefully
   - If it mentions "farm shop" -> use {{image: farm-produce}}, {{image: fresh-vegetables}}, etc.
   - If it mentions "restaurant" -> use {{image: food-dish}}, {{image: restaurant-interior}}, etc.
   - If it mentions "salon" -> use {{image: salon-interior}}, {{image: haircut-style}}, etc.
   - **NEVER use vague labels like "nature", "landscape", "road", "lights"**
   - **Always match image labels to the specific business type mentioned**
6. Keep CSS concise. Use flexbox/grid for layout.
7. Make it responsive and visually appealing.
8. Ensure the page is complete and ready to save as .html.
9. Do NOT generate any URLs or fetch images - only use {{image: label}} placeholders.
"#;

const UPDATE_PROMPT_TEMPLATE: &str = r#"You are a web developer. Here is the current HTML of a website:

<current_html>
{current_html}
</current_html>

The user wants to make the following changes/updates:
{update_prompt}

CRITICAL RULES - MUST FOLLOW EXACTLY:
1. **KEEP THE ENTIRE STRUCTURE** - Do NOT regenerate the whole page
2. **ONLY modify the specific parts** that the user requested
3. **PRESERVE all CSS styling and layout** - Do not change CSS unless requested
4. **PRESERVE all existing content** - Only change what was asked
5. **PRESERVE all image placeholders** - Use EXACTLY the same format: {{image: label}}
6. **Do NOT regenerate sections** - Just update the requested content
7. Output ONLY the updated HTML (no explanations or markdown)
8. Ensure the HTML is valid and complete
9. Make minimal changes - only what was requested

EXAMPLES:
- If user says "change color to red": Only update color values in CSS, keep everything else
- If user says "add testimonials": Add a new section, don't regenerate the whole page
- If user says "update menu": Only change the menu items, keep layout and styling

Updated HTML:"#;

/// Template HTML is capped before inclusion to keep the prompt within
/// provider context budgets.
const TEMPLATE_CONTEXT_CAP: usize = 3000;

pub fn website_prompt(user_prompt: &str, template_context: &str) -> String {
    WEBSITE_PROMPT_TEMPLATE
        .replace("{user_prompt}", user_prompt)
        .replace("{template_context}", template_context)
        .trim()
        .to_string()
}

pub fn update_prompt(current_html: &str, update_request: &str) -> String {
    UPDATE_PROMPT_TEMPLATE
        .replace("{current_html}", current_html)
        .replace("{update_prompt}", update_request)
}

/// Wraps loaded template HTML in the "modify this base" instruction block.
pub fn template_context(template_html: &str) -> String {
    let capped: String = template_html.chars().take(TEMPLATE_CONTEXT_CAP).collect();
    format!(
        "TEMPLATE TO MODIFY:\n\
        Below is the HTML template that should be modified and customized based on the user's request.\n\
        Use this as the base structure and adapt it according to the user's needs.\n\n\
        <template_html>\n{capped}\n</template_html>\n\n\
        INSTRUCTIONS:\n\
        1. Use the provided template as the base structure\n\
        2. Modify the content, text, and styling to match the user's request\n\
        3. Keep the overall layout and structure from the template\n\
        4. Update colors, fonts, and content to fit the user's needs\n\
        5. Replace placeholder content with user-specific information\n\
        6. Keep all existing CSS classes and structure - just update the details\n\
        7. If the template has image placeholders, keep them and they will be filled automatically\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_prompt_substitutes_tokens() {
        let prompt = website_prompt("a bakery site", "");
        assert!(prompt.starts_with("Create a single HTML page based on this description: a bakery site"));
        assert!(!prompt.contains("{user_prompt}"));
        assert!(!prompt.contains("{template_context}"));
    }

    #[test]
    fn test_website_prompt_keeps_placeholder_contract_literal() {
        let prompt = website_prompt("x", "");
        assert!(prompt.contains("{{image: descriptive-label}}"));
        assert!(prompt.contains("{{image: profile}}"));
    }

    #[test]
    fn test_update_prompt_embeds_html_and_request() {
        let prompt = update_prompt("<html><body>hi</body></html>", "make the header red");
        assert!(prompt.contains("<current_html>\n<html><body>hi</body></html>\n</current_html>"));
        assert!(prompt.contains("make the header red"));
        assert!(prompt.contains("{{image: label}}"));
    }

    #[test]
    fn test_template_context_caps_length() {
        let long = "x".repeat(10_000);
        let context = template_context(&long);
        assert!(context.contains(&"x".repeat(3000)));
        assert!(!context.contains(&"x".repeat(3001)));
    }
}
