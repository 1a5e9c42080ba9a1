//! Compile and render page-builder section components.
//!
//! A section is a `(config, source)` pair. The source is a Rhai expression producing a component
//! closure; it is compiled against an ordered [`Scope`] of rendering primitives, icons and the
//! config, then rendered behind an error boundary that turns every failure into a
//! [`RenderResult::Failed`] instead of propagating it.
//!
//! Rhai exposes no filesystem, network or process surface and module imports are disabled, but
//! this is not a multi-tenant sandbox. Untrusted source still needs process isolation.

mod compiler;
mod dsl;
mod error;
pub mod gallery;
mod icons;
pub mod node;
mod render;
mod scope;
mod section;
pub mod templates;
mod validation;

#[cfg(test)]
mod test_compiler;
#[cfg(test)]
mod test_render;
#[cfg(test)]
mod test_templates;

pub use compiler::{
    CompiledComponent, MAX_ARRAY_SIZE, MAX_CALL_LEVELS, MAX_EXPR_DEPTH, MAX_FN_EXPR_DEPTH,
    MAX_MAP_SIZE, MAX_OPERATIONS, MAX_STRING_SIZE, compile, strip_module_syntax,
};
pub use dsl::ElementFactory;
pub use error::{Error, Stage, excerpt_at};
pub use icons::{ICON_NAMES, Icon, icon_set};
pub use node::{Element, Node};
pub use render::{
    Preview, PreviewState, RenderFailure, RenderResult, compile_and_render, compile_guarded,
    render, render_page,
};
pub use scope::Scope;
pub use section::{SectionConfig, SectionKind};
