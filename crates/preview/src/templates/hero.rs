use serde_json::json;

use super::literal::{number, text};
use crate::SectionConfig;

/// Sample hero config.
pub(super) fn default_config() -> SectionConfig {
    let mut config = SectionConfig::new();
    config.set(
        "backgroundImage",
        json!("https://lovelang.in/cdn/shop/files/shop-all-banner-1.jpg?v=1747823477&width=1600"),
    );
    config.set("heading", json!("Fruit-Powered Hair Care"));
    config.set(
        "subtitle",
        json!("Nourish every strand with natural ingredients your hair will love"),
    );
    config.set("buttonText", json!("Shop Now"));
    config.set("textColor", json!("#ffffff"));
    config.set("overlayOpacity", json!(40));
    config
}

pub(super) fn generate(config: &SectionConfig) -> String {
    let defaults = default_config();
    let field = |key: &str| text(config.get(key).or_else(|| defaults.get(key)), "");
    let background = field("backgroundImage");
    let heading = field("heading");
    let subtitle = field("subtitle");
    let button = field("buttonText");
    let color = field("textColor");
    let overlay = number(config.get("overlayOpacity").or_else(|| defaults.get("overlayOpacity")), "0");

    format!(
        r#"// HeroSection
|props| h.el("section", #{{
    "class": "h-screen bg-cover bg-center relative flex items-center justify-center",
    "style": #{{
        "backgroundImage": "url(" + {background} + ")"
    }}
}}, [
    h.el("div", #{{
        "class": "absolute inset-0 bg-black",
        "style": #{{
            "opacity": {overlay} / 100.0
        }}
    }}),
    h.el("div", #{{ "class": "relative z-10 text-center max-w-4xl px-4" }}, [
        h.el("h1", #{{
            "class": "text-5xl md:text-7xl font-bold mb-6",
            "style": #{{
                "color": {color}
            }}
        }}, [
            {heading}
        ]),
        h.el("p", #{{
            "class": "text-xl md:text-2xl mb-8 max-w-2xl mx-auto",
            "style": #{{
                "color": {color}
            }}
        }}, [
            {subtitle}
        ]),
        h.el("button", #{{ "class": "bg-orange-600 text-white px-8 py-4 rounded-lg text-lg font-semibold hover:bg-orange-700 transition-colors" }}, [
            {button}
        ])
    ])
])
"#
    )
}
