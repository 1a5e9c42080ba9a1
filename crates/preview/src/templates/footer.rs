use serde_json::{Map, Value, json};

use super::literal::{indent, items, string_lit, text};
use crate::SectionConfig;

/// Social networks in display order, with the icon each one uses.
const SOCIAL: &[(&str, &str)] = &[
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("twitter", "Twitter"),
];

/// Sample footer config.
pub(super) fn default_config() -> SectionConfig {
    let mut config = SectionConfig::new();
    config.set("companyName", json!("LoveLang"));
    config.set(
        "description",
        json!("Fruit-powered hair care made with natural ingredients and a lot of love."),
    );
    config.set("backgroundColor", json!("#1f2937"));
    config.set("textColor", json!("#ffffff"));
    config.set(
        "links",
        json!({
            "company": [
                {"text": "About Us", "href": "/about"},
                {"text": "Careers", "href": "/careers"},
                {"text": "Press", "href": "/press"}
            ],
            "support": [
                {"text": "Contact", "href": "/contact"},
                {"text": "Shipping", "href": "/shipping"},
                {"text": "Returns", "href": "/returns"}
            ],
            "legal": [
                {"text": "Privacy Policy", "href": "/privacy"},
                {"text": "Terms of Service", "href": "/terms"}
            ]
        }),
    );
    config.set(
        "socialMedia",
        json!({
            "facebook": "https://facebook.com/lovelang",
            "instagram": "https://instagram.com/lovelang",
            "twitter": ""
        }),
    );
    config.set("copyright", json!("© 2024 LoveLang. All rights reserved."));
    config
}

/// `(text, href)` anchor with the given class.
fn anchor(link: &Value, class: &str) -> String {
    let label = text(link.get("text"), "");
    let href = text(link.get("href"), "#");
    let class = string_lit(class);
    format!(
        r#"h.el("a", #{{
    "href": {href},
    "class": {class}
}}, [
    {label}
])"#
    )
}

/// A titled column of links.
fn column(title: &str, links: &[Value]) -> String {
    let title = string_lit(title);
    let entries: Vec<String> = links
        .iter()
        .map(|link| {
            format!(
                "h.el(\"li\", (), [\n{}\n])",
                indent(&anchor(link, "text-gray-300 hover:text-white transition-colors"), 4)
            )
        })
        .collect();
    let entries = items(&entries, 8);
    format!(
        r#"h.el("div", (), [
    h.el("h4", #{{ "class": "text-lg font-semibold mb-4" }}, [
        {title}
    ]),
    h.el("ul", #{{ "class": "space-y-2" }}, [
{entries}
    ])
])"#
    )
}

/// Icon link for one social network.
fn social_link(url: &str, icon: &str) -> String {
    let url = string_lit(url);
    format!(
        r#"h.el("a", #{{
    "href": {url},
    "class": "hover:text-orange-400 transition-colors"
}}, [
    h.icon({icon}, #{{ "size": 24 }})
])"#
    )
}

/// Links under `key` of the `links` object.
fn links<'a>(group: Option<&'a Map<String, Value>>, key: &str) -> &'a [Value] {
    group
        .and_then(|g| g.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(super) fn generate(config: &SectionConfig) -> String {
    let defaults = default_config();
    let field = |key: &str| text(config.get(key).or_else(|| defaults.get(key)), "");
    let company = field("companyName");
    let description = field("description");
    let background = field("backgroundColor");
    let color = field("textColor");
    let copyright = field("copyright");

    let link_groups = match config.get("links") {
        Some(_) => config.object("links"),
        None => defaults.object("links"),
    };
    let social = match config.get("socialMedia") {
        Some(_) => config.object("socialMedia"),
        None => defaults.object("socialMedia"),
    };

    let socials: Vec<String> = SOCIAL
        .iter()
        .filter_map(|(key, icon)| {
            let url = social.and_then(|s| s.get(*key)).and_then(Value::as_str)?;
            (!url.is_empty()).then(|| social_link(url, icon))
        })
        .collect();
    let socials = items(&socials, 20);
    let columns = items(
        &[
            column("Company", links(link_groups, "company")),
            column("Support", links(link_groups, "support")),
        ],
        12,
    );
    let legal: Vec<String> = links(link_groups, "legal")
        .iter()
        .map(|link| anchor(link, "hover:text-white transition-colors"))
        .collect();
    let legal = items(&legal, 16);

    format!(
        r#"// FooterSection
|props| h.el("footer", #{{
    "class": "py-16",
    "style": #{{
        "backgroundColor": {background},
        "color": {color}
    }}
}}, [
    h.el("div", #{{ "class": "container mx-auto px-4" }}, [
        h.el("div", #{{ "class": "grid md:grid-cols-4 gap-8 mb-12" }}, [
            h.el("div", #{{ "class": "md:col-span-2" }}, [
                h.el("h3", #{{ "class": "text-2xl font-bold mb-4" }}, [
                    {company}
                ]),
                h.el("p", #{{ "class": "text-gray-300 mb-6 max-w-md" }}, [
                    {description}
                ]),
                h.el("div", #{{ "class": "flex space-x-4" }}, [
{socials}
                ])
            ]),
{columns}
        ]),
        h.el("div", #{{ "class": "border-t border-gray-700 pt-8 text-center" }}, [
            h.el("p", #{{ "class": "text-gray-400" }}, [
                {copyright}
            ]),
            h.el("div", #{{ "class": "mt-4 flex justify-center space-x-6 text-sm text-gray-400" }}, [
{legal}
            ])
        ])
    ])
])
"#
    )
}
