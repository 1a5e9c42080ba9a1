use serde_json::{Value, json};

use super::literal::{indent, items, text};
use crate::SectionConfig;

/// Sample collections config.
pub(super) fn default_config() -> SectionConfig {
    let mut config = SectionConfig::new();
    config.set("title", json!("Shop by Collection"));
    config.set(
        "subtitle",
        json!("Each range is built around one fruit and one hair concern"),
    );
    config.set("backgroundColor", json!("#fff7ed"));
    config.set(
        "collections",
        json!([
            {
                "id": "mango",
                "name": "Mango Collection",
                "image": "https://lovelang.in/cdn/shop/files/mango-collection-hero.jpg?v=1747823477&width=400",
                "description": "Deep nourishment for dry, frizzy hair",
                "color": "#fbbf24"
            },
            {
                "id": "avocado",
                "name": "Avocado Collection",
                "image": "https://lovelang.in/cdn/shop/files/avocado-collection-hero.jpg?v=1747823477&width=400",
                "description": "Repair and strength for damaged hair",
                "color": "#86efac"
            },
            {
                "id": "berry",
                "name": "Berry Collection",
                "image": "https://lovelang.in/cdn/shop/files/berry-collection-hero.jpg?v=1747823477&width=400",
                "description": "Shine and colour protection",
                "color": "#f9a8d4"
            }
        ]),
    );
    config
}

/// One collection card.
fn card(item: &Value) -> String {
    let field = |key: &str| text(item.get(key), "");
    let id = field("id");
    let name = field("name");
    let image = field("image");
    let description = field("description");
    let color = field("color");
    format!(
        r#"h.el("div", #{{
    "class": "text-center group cursor-pointer",
    "data-id": {id}
}}, [
    h.el("div", #{{
        "class": "w-48 h-48 mx-auto rounded-full mb-6 overflow-hidden group-hover:scale-105 transition-transform duration-300",
        "style": #{{
            "backgroundColor": {color}
        }}
    }}, [
        h.el("img", #{{
            "src": {image},
            "alt": {name},
            "class": "w-full h-full object-cover"
        }})
    ]),
    h.el("h3", #{{ "class": "text-2xl font-semibold mb-2" }}, [
        {name}
    ]),
    h.el("p", #{{ "class": "text-gray-600" }}, [
        {description}
    ])
])"#
    )
}

pub(super) fn generate(config: &SectionConfig) -> String {
    let defaults = default_config();
    let field = |key: &str| text(config.get(key).or_else(|| defaults.get(key)), "");
    let title = field("title");
    let subtitle = field("subtitle");
    let background = field("backgroundColor");
    let collections = match config.get("collections") {
        Some(_) => config.array("collections"),
        None => defaults.array("collections"),
    };
    let cards: Vec<String> = collections.iter().map(card).collect();
    let cards = items(&cards, 12);
    let grid = indent("h.el(\"div\", #{ \"class\": \"grid md:grid-cols-3 gap-8\" }, [", 8);

    format!(
        r#"// CollectionsSection
|props| h.el("section", #{{
    "class": "py-20",
    "style": #{{
        "backgroundColor": {background}
    }}
}}, [
    h.el("div", #{{ "class": "container mx-auto px-4" }}, [
        h.el("div", #{{ "class": "text-center mb-16" }}, [
            h.el("h2", #{{ "class": "text-4xl md:text-5xl font-bold mb-4" }}, [
                {title}
            ]),
            h.el("p", #{{ "class": "text-xl text-gray-600 max-w-2xl mx-auto" }}, [
                {subtitle}
            ])
        ]),
{grid}
{cards}
        ])
    ])
])
"#
    )
}
