//! Built-in catalog data, used when the shared JSON files are absent or
//! invalid. Kept as JSON so the defaults and the on-disk format never drift.

pub const STYLE_PRESETS_JSON: &str = r##"{
  "brutalist": {
    "label": "Brutalist Bold",
    "palette": ["#000000", "#f4f4f4", "#ff0054"],
    "fonts": ["Space Grotesk", "Inter"],
    "mood": ["bold", "architectural", "minimal"],
    "ui_accents": "thick borders, stark boxes, asymmetric layout",
    "instructions": "Use high-contrast surfaces, unapologetically large typography, and minimal gradients.",
    "image_prompt": "brutalist aesthetic, bold high-contrast colors, punchy geometric composition"
  },
  "editorial": {
    "label": "Editorial Luxe",
    "palette": ["#0f172a", "#f8fafc", "#eab308"],
    "fonts": ["Playfair Display", "Source Sans Pro"],
    "mood": ["refined", "magazine-like", "balanced"],
    "ui_accents": "generous whitespace, split layouts, elegant rules and captions",
    "instructions": "Emphasize large serif headlines, supporting sans-serif body copy, and balanced columns.",
    "image_prompt": "editorial magazine photography, soft lighting, high-end typography overlays"
  },
  "neomorphism": {
    "label": "Neo-morphism Soft Glow",
    "palette": ["#ecf0f3", "#cfd8dc", "#5c6ac4"],
    "fonts": ["Poppins", "Nunito"],
    "mood": ["soft", "tactile", "futuristic"],
    "ui_accents": "subtle shadows, pill buttons, frosted cards, glowing highlights",
    "instructions": "Use layered cards with soft drop shadows, rounded corners, and gentle gradients.",
    "image_prompt": "soft lit 3D renders, neumorphic interface visuals, gentle glow"
  },
  "artisan": {
    "label": "Warm Artisan",
    "palette": ["#2c1810", "#f7ede2", "#f28482"],
    "fonts": ["Cormorant Garamond", "Work Sans"],
    "mood": ["warm", "craft-focused", "story-driven"],
    "ui_accents": "textured backgrounds, hand-drawn dividers, layered cards",
    "instructions": "Incorporate organic shapes, textured backgrounds, and storytelling callouts.",
    "image_prompt": "artisan lifestyle photography, warm film tones, handcrafted details"
  }
}"##;

pub const COMPONENT_LIBRARY_JSON: &str = r##"{
  "hero": {
    "label": "Hero Sections",
    "description": "Above-the-fold intros that mix bold headlines, supporting copy, CTAs, and imagery.",
    "variants": [
      {
        "id": "hero_split_image",
        "name": "Split Layout",
        "layout": "Two-column grid with text on the left and layered imagery on the right.",
        "content_focus": ["Headline", "Value bullets", "Primary CTA"],
        "visual_notes": "Use gradient accent behind the image and floating stat cards.",
        "best_for": ["saas", "agency", "product", "general"],
        "css_primitives": ["grid", "gradient-background", "rounded-3xl", "shadow-2xl"]
      }
    ]
  },
  "testimonials": {
    "label": "Testimonials",
    "description": "Social proof layouts to build trust.",
    "variants": [
      {
        "id": "testimonials_cards",
        "name": "Card Grid",
        "layout": "Responsive grid of testimonial cards with star ratings.",
        "content_focus": ["Quote", "Star rating", "Avatar"],
        "visual_notes": "Alternate background tints and include quotation marks.",
        "best_for": ["saas", "agency", "services", "general"],
        "css_primitives": ["grid", "rounded-2xl", "shadow-md", "accent-border"]
      }
    ]
  },
  "pricing": {
    "label": "Pricing Tables",
    "description": "Package comparisons with highlighted plan.",
    "variants": [
      {
        "id": "pricing_three_tiers",
        "name": "Three Tiers",
        "layout": "Three-column cards with middle plan elevated.",
        "content_focus": ["Plan name", "Price", "Feature list", "CTA"],
        "visual_notes": "Scale featured card and add badge chip.",
        "best_for": ["saas", "platforms", "services", "general"],
        "css_primitives": ["grid-cols-3", "featured-scale", "badge-chip", "icon-list"]
      }
    ]
  },
  "timeline": {
    "label": "Timeline / Process",
    "description": "Steps or milestones to explain journey or roadmap.",
    "variants": [
      {
        "id": "timeline_vertical_cards",
        "name": "Vertical Cards",
        "layout": "Stacked cards along a vertical line with alternating alignment.",
        "content_focus": ["Date", "Title", "Description"],
        "visual_notes": "Alternate alignment, add soft shadows, include connectors.",
        "best_for": ["agency", "case-study", "education", "general"],
        "css_primitives": ["timeline", "shadow-lg", "connector-line", "accent-dot"]
      }
    ]
  }
}"##;

pub const INTERACTIVE_ENHANCEMENTS_JSON: &str = r##"{
  "animated_counters": {
    "label": "Animated Counters",
    "purpose": "Highlight key metrics with numbers that ease upward when scrolled into view.",
    "placement": "Impact stats in hero sections, success metrics, or social proof bands.",
    "implementation": "Use data attributes for target values and trigger the animation when the element enters the viewport."
  },
  "parallax_timeline": {
    "label": "Parallax Timeline",
    "purpose": "Tell a story with milestones that move at different speeds for depth.",
    "placement": "Roadmaps, brand history, or process sections spanning full width.",
    "implementation": "Use layered backgrounds with translateY offsets and subtle scroll speed differences."
  },
  "testimonial_carousel": {
    "label": "Testimonial Carousel",
    "purpose": "Cycle through quotes automatically while allowing manual control.",
    "placement": "Trust band or social proof sections near CTAs.",
    "implementation": "Use a lightweight slider (CSS scroll snap or minimal JS) with play/pause on hover."
  },
  "hover_reveal_cards": {
    "label": "Hover Reveal Cards",
    "purpose": "Show additional context or imagery when hovering/focusing on service cards.",
    "placement": "Services/features grids or portfolio cards.",
    "implementation": "Flip or fade in extended copy via transform and opacity transitions; ensure keyboard focus support."
  },
  "micro_interaction_cta": {
    "label": "Magnetic CTA",
    "purpose": "Primary CTA button subtly follows cursor or pulses to draw attention.",
    "placement": "Hero or pricing sections.",
    "implementation": "Use small translate transforms tied to mouse position plus glow animation."
  },
  "lightweight_3d_embed": {
    "label": "Lightweight 3D Embed",
    "purpose": "Embed a small WebGL/Spline scene for a premium hero visual.",
    "placement": "Hero right column or a spotlight section.",
    "implementation": "Use an iframe/container with gentle rotation and provide fallback image."
  }
}"##;
