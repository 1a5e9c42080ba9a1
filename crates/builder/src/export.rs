//! Packaging sections for download.

use std::{fmt, str::FromStr};

use preview::{SectionConfig, compile_and_render};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{SectionId, StoredSection};

/// Version stamped on every bundle.
pub const BUNDLE_VERSION: &str = "1.0.0";

/// What each exported section carries besides its source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Component source only.
    #[default]
    Source,
    /// Source plus the rendered static markup.
    Html,
    /// Source plus config, for re-import as a template.
    Template,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Html => "html",
            Self::Template => "template",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "source" | "react" => Ok(Self::Source),
            "html" => Ok(Self::Html),
            "template" => Ok(Self::Template),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Bundle format.
    pub format: ExportFormat,
    /// Include each section's custom CSS.
    pub include_styles: bool,
    /// Include each section's config. On by default, and always on for [`ExportFormat::Template`].
    pub include_config: bool,
    /// Bundle name.
    pub package_name: String,
    /// Bundle description.
    pub description: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            include_styles: true,
            include_config: true,
            package_name: "my-website-template".to_string(),
            description: "Custom website template".to_string(),
        }
    }
}

/// One section inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSection {
    /// Section id.
    pub id: SectionId,
    /// Component source.
    pub code: String,
    /// Config, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SectionConfig>,
    /// Custom CSS, when requested and present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    /// Rendered markup, for [`ExportFormat::Html`]. A failed render exports its error panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// A downloadable set of sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// Bundle name.
    pub name: String,
    /// Bundle format version.
    pub version: String,
    /// Bundle description.
    pub description: String,
    /// Format the bundle was produced in.
    pub format: ExportFormat,
    /// Sections, in the order given.
    pub sections: Vec<ExportedSection>,
}

impl ExportBundle {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Package `sections` according to `options`.
pub fn export(options: &ExportOptions, sections: &[(SectionId, StoredSection)]) -> ExportBundle {
    let with_config = options.include_config || options.format == ExportFormat::Template;
    let sections = sections
        .iter()
        .map(|(id, stored)| ExportedSection {
            id: id.clone(),
            code: stored.code.clone(),
            config: with_config.then(|| stored.config.clone()),
            css: stored
                .css
                .clone()
                .filter(|css| options.include_styles && !css.trim().is_empty()),
            html: (options.format == ExportFormat::Html)
                .then(|| compile_and_render(&stored.code, &stored.config).to_html()),
        })
        .collect::<Vec<_>>();
    debug!(format = %options.format, sections = sections.len(), "exported bundle");
    ExportBundle {
        name: options.package_name.clone(),
        version: BUNDLE_VERSION.to_string(),
        description: options.description.clone(),
        format: options.format,
        sections,
    }
}
