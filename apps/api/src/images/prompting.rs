//! Best-effort prompt enrichment: rewrites generic image prompts into
//! domain-specific photography prompts via keyword sniffing. No keyword
//! match means the raw prompt is used as-is.

/// Enriches an image prompt before it is dispatched to generation or search.
pub fn enrich(prompt: &str) -> String {
    let lower = prompt.to_lowercase();

    if lower.contains("biriyani") || lower.contains("biryani") {
        return "delicious biryani rice dish, indian cuisine, food photography, high quality"
            .to_string();
    }
    if lower.contains("lamb")
        && ["rogan", "josh", "food", "dish", "curry"]
            .iter()
            .any(|w| lower.contains(w))
    {
        return "lamb rogan josh, kashmiri curry, indian dish, food photography, delicious meal, high quality"
            .to_string();
    }
    if lower.contains("food") || lower.contains("dish") {
        return format!("{prompt}, food photography, delicious meal, high quality, professional");
    }
    if lower.contains("cleaning") {
        return "professional cleaning service, clean, modern, high quality".to_string();
    }
    if lower.contains("portfolio") {
        return "professional portfolio work, modern design, high quality".to_string();
    }

    prompt.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biryani_spellings_map_to_food_photography_prompt() {
        assert!(enrich("biriyani special").contains("biryani rice dish"));
        assert!(enrich("Biryani platter").contains("food photography"));
    }

    #[test]
    fn test_lamb_curry_combination() {
        let out = enrich("lamb rogan josh dish");
        assert!(out.contains("kashmiri curry"));
    }

    #[test]
    fn test_generic_food_prompt_is_suffixed_not_replaced() {
        let out = enrich("signature food-dish");
        assert!(out.starts_with("signature food-dish"));
        assert!(out.contains("food photography"));
    }

    #[test]
    fn test_unmatched_prompt_is_untouched() {
        assert_eq!(enrich("salon-interior"), "salon-interior");
    }
}
