//! Static source generators for the built-in section kinds.
//!
//! Generation is pure: the same config always yields the same text. Every config value lands in
//! its own region of the output, on its own line, so a one-field edit changes only the lines that
//! field feeds. Missing keys fall back to the kind's sample config.

mod collections;
mod footer;
mod hero;
mod literal;

pub use literal::string_lit;

use crate::{SectionConfig, SectionKind};

/// Generate component source for `kind` from `config`.
pub fn generate(kind: SectionKind, config: &SectionConfig) -> String {
    match kind {
        SectionKind::Hero => hero::generate(config),
        SectionKind::Collections => collections::generate(config),
        SectionKind::Footer => footer::generate(config),
    }
}

/// The sample config for `kind`.
pub fn default_config(kind: SectionKind) -> SectionConfig {
    match kind {
        SectionKind::Hero => hero::default_config(),
        SectionKind::Collections => collections::default_config(),
        SectionKind::Footer => footer::default_config(),
    }
}
