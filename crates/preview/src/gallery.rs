//! Built-in template catalogue.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    SectionConfig, SectionKind,
    templates::{default_config, generate},
};

/// Gallery filter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Hero banners.
    Hero,
    /// Collection showcases.
    Collection,
    /// Product grids.
    Product,
    /// Footers.
    Footer,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hero => "hero",
            Self::Collection => "collection",
            Self::Product => "product",
            Self::Footer => "footer",
        })
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hero" => Ok(Self::Hero),
            "collection" | "collections" => Ok(Self::Collection),
            "product" | "products" => Ok(Self::Product),
            "footer" => Ok(Self::Footer),
            other => Err(format!(
                "unknown category '{}' (expected hero, collection, product or footer)",
                other
            )),
        }
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryTemplate {
    /// Stable identifier, e.g. `hero-lovelang`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Filter category.
    pub category: Category,
    /// Search tags.
    pub tags: &'static [&'static str],
    /// Download counter shown in listings.
    pub downloads: u32,
    /// The section kind this template edits.
    pub kind: SectionKind,
}

impl GalleryTemplate {
    /// Config loaded when this template is selected.
    pub fn config(&self) -> SectionConfig {
        default_config(self.kind)
    }

    /// Generated source for this template.
    pub fn code(&self) -> String {
        generate(self.kind, &self.config())
    }
}

/// Every built-in template.
const TEMPLATES: &[GalleryTemplate] = &[
    GalleryTemplate {
        id: "hero-lovelang",
        name: "LoveLang Hero",
        description: "Beautiful hero section with fruit-themed background",
        category: Category::Hero,
        tags: &["beauty", "ecommerce", "hero"],
        downloads: 245,
        kind: SectionKind::Hero,
    },
    GalleryTemplate {
        id: "collections-fruit",
        name: "Fruit Collections",
        description: "Product collection showcase with hover effects",
        category: Category::Collection,
        tags: &["products", "grid", "collections"],
        downloads: 189,
        kind: SectionKind::Collections,
    },
    GalleryTemplate {
        id: "footer-modern",
        name: "Modern Footer",
        description: "Clean footer with social links and company info",
        category: Category::Footer,
        tags: &["footer", "links", "social"],
        downloads: 167,
        kind: SectionKind::Footer,
    },
];

/// Templates in `category`, or all of them.
pub fn gallery(category: Option<Category>) -> Vec<&'static GalleryTemplate> {
    TEMPLATES
        .iter()
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect()
}

/// Look up a template by id.
pub fn find(id: &str) -> Option<&'static GalleryTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
