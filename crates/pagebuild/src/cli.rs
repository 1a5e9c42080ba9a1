//! Command-line interface definitions for pagebuild.

use std::path::PathBuf;

use builder::ExportFormat;
use clap::{Args, Parser, Subcommand};
use logging::LogArgs;
use preview::{SectionKind, gallery::Category};

/// Command-line interface for the `pagebuild` binary.
#[derive(Parser, Debug)]
#[command(
    name = "pagebuild",
    about = "Generate, preview and export page sections",
    version
)]
pub struct Cli {
    /// Logging controls shared across our binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Directory holding stored sections.
    #[arg(long, global = true, default_value = "./sections", value_name = "DIR")]
    pub store: PathBuf,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the component source generated for a section kind.
    Generate(GenerateArgs),
    /// Render a section to HTML on stdout.
    Preview(PreviewArgs),
    /// Store a section.
    Save(SaveArgs),
    /// Print a stored section as JSON.
    Show(ShowArgs),
    /// Bundle stored sections into `<DIR>/<package-name>.json`.
    Export(ExportArgs),
    /// List the built-in templates.
    Gallery(GalleryArgs),
    /// Print, and optionally store, a built-in template.
    Template(TemplateArgs),
}

/// Arguments for `generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Section kind (hero, collections or footer).
    #[arg(long)]
    pub kind: SectionKind,

    /// JSON config file. The kind's sample config is used when omitted.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for `preview`.
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Stored section to start from.
    #[arg(long, value_name = "ID", required_unless_present = "code")]
    pub section: Option<String>,

    /// Component source file, replacing the stored code.
    #[arg(long, value_name = "FILE")]
    pub code: Option<PathBuf>,

    /// JSON config file, replacing the stored config.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for `save`.
#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    /// Section id to store under.
    #[arg(long, value_name = "ID")]
    pub section: String,

    /// JSON config file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Component source file. Generated from the config when omitted.
    #[arg(long, value_name = "FILE")]
    pub code: Option<PathBuf>,

    /// Custom CSS file.
    #[arg(long, value_name = "FILE")]
    pub css: Option<PathBuf>,
}

/// Arguments for `show`.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Section id to print.
    #[arg(long, value_name = "ID")]
    pub section: String,
}

/// Arguments for `export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Sections to include, in order.
    #[arg(long = "section", value_name = "ID", required = true, num_args = 1..)]
    pub sections: Vec<String>,

    /// Bundle format (source, html or template).
    #[arg(long, default_value_t = ExportFormat::Source)]
    pub format: ExportFormat,

    /// Bundle name, also used as the file name.
    #[arg(long, default_value = "my-website-template")]
    pub package_name: String,

    /// Bundle description.
    #[arg(long, default_value = "Custom website template")]
    pub description: String,

    /// Leave custom CSS out of the bundle.
    #[arg(long)]
    pub no_styles: bool,

    /// Leave section configs out of the bundle. Ignored for the template format.
    #[arg(long)]
    pub no_config: bool,

    /// Directory to write the bundle into.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub out: PathBuf,
}

/// Arguments for `gallery`.
#[derive(Args, Debug, Clone)]
pub struct GalleryArgs {
    /// Only list templates in this category.
    #[arg(long)]
    pub category: Option<Category>,
}

/// Arguments for `template`.
#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Template id, as listed by `gallery`.
    #[arg(long)]
    pub id: String,

    /// Store the template under its section id.
    #[arg(long)]
    pub save: bool,
}
