//! The error boundary between compiled components and the rest of the builder.

use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
};

use rhai::{Dynamic, Map};
use tracing::{debug, warn};

use crate::{
    CompiledComponent, Error, Scope, SectionConfig,
    compiler::compile,
    dsl::to_node,
    error::Stage,
    node::{Node, escape_html},
};

/// A rendering failure captured at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    /// Which half of the pipeline failed.
    pub stage: Stage,
    /// Short, single-line message.
    pub message: String,
    /// Full diagnostic including location, excerpt and trace.
    pub detail: String,
}

impl RenderFailure {
    /// Capture a pipeline error.
    fn from_error(err: &Error) -> Self {
        Self {
            stage: err.stage(),
            message: err.to_string(),
            detail: err.pretty(),
        }
    }

    /// Capture a panic raised during `stage`.
    fn panicked(stage: Stage, payload: &(dyn Any + Send)) -> Self {
        let text = panic_payload_to_string(payload);
        Self {
            stage,
            message: format!("component panicked: {}", text),
            detail: format!("Panic during {}\n{}", stage_label(stage), text),
        }
    }

    /// The error panel shown in place of the section.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<div class=\"p-8 text-center bg-red-50 border border-red-200 rounded-lg\" role=\"alert\" data-stage=\"{}\">",
                "<h3 class=\"text-xl font-semibold text-red-800 mb-2\">Component Error</h3>",
                "<p class=\"text-red-600 text-sm\">{}</p>",
                "<details class=\"mt-4 text-left\">",
                "<summary class=\"cursor-pointer text-red-700 font-medium\">Show Details</summary>",
                "<pre class=\"mt-2 text-xs bg-red-100 p-2 rounded overflow-auto\">{}</pre>",
                "</details></div>"
            ),
            stage_label(self.stage),
            escape_html(&self.message),
            escape_html(&self.detail)
        )
    }
}

/// Outcome of rendering one section. Never an error that propagates.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// The component produced a render tree.
    Rendered(Node),
    /// Compiling or rendering failed.
    Failed(RenderFailure),
}

impl RenderResult {
    /// Whether a render tree was produced.
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    /// The render tree, if any.
    pub fn node(&self) -> Option<&Node> {
        match self {
            Self::Rendered(node) => Some(node),
            Self::Failed(_) => None,
        }
    }

    /// The failure, if any.
    pub fn failure(&self) -> Option<&RenderFailure> {
        match self {
            Self::Rendered(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// HTML for the section: the rendered tree or the error panel.
    pub fn to_html(&self) -> String {
        match self {
            Self::Rendered(node) => node.to_html(),
            Self::Failed(failure) => failure.to_html(),
        }
    }
}

/// Stage name used in panels and diagnostics.
fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Compile => "compile",
        Stage::Runtime => "runtime",
    }
}

/// Best-effort text of a panic payload.
fn panic_payload_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Props handed to a component: `#{config: ...}`.
fn props_for(config: &SectionConfig) -> Result<Dynamic, Error> {
    let mut props = Map::new();
    props.insert("config".into(), config.to_dynamic()?);
    Ok(Dynamic::from_map(props))
}

/// Render a compiled component with `config`, capturing every failure.
pub fn render(component: &CompiledComponent, config: &SectionConfig) -> RenderResult {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let value = component.call(props_for(config)?)?;
        to_node(value).map_err(|message| Error::Runtime {
            line: None,
            col: None,
            message: format!("component returned a value that cannot be rendered: {}", message),
            excerpt: None,
            trace: Vec::new(),
        })
    }));
    match outcome {
        Ok(Ok(node)) => RenderResult::Rendered(node),
        Ok(Err(err)) => {
            debug!(error = %err, "section render failed");
            RenderResult::Failed(RenderFailure::from_error(&err))
        }
        Err(payload) => {
            let failure = RenderFailure::panicked(Stage::Runtime, payload.as_ref());
            warn!(message = %failure.message, "section render panicked");
            RenderResult::Failed(failure)
        }
    }
}

/// Compile `source` against the standard scope for `config`, capturing every failure.
pub fn compile_guarded(
    source: &str,
    config: &SectionConfig,
) -> Result<CompiledComponent, RenderFailure> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let scope = Scope::standard(config)?;
        compile(source, &scope)
    }));
    match outcome {
        Ok(Ok(component)) => Ok(component),
        Ok(Err(err)) => {
            debug!(error = %err, "section compile failed");
            Err(RenderFailure::from_error(&err))
        }
        Err(payload) => {
            let failure = RenderFailure::panicked(Stage::Compile, payload.as_ref());
            warn!(message = %failure.message, "section compile panicked");
            Err(failure)
        }
    }
}

/// Compile and render in one step.
pub fn compile_and_render(source: &str, config: &SectionConfig) -> RenderResult {
    match compile_guarded(source, config) {
        Ok(component) => render(&component, config),
        Err(failure) => RenderResult::Failed(failure),
    }
}

/// Render several sections, each behind its own boundary.
pub fn render_page<'a, I>(sections: I) -> Vec<RenderResult>
where
    I: IntoIterator<Item = (&'a str, &'a SectionConfig)>,
{
    sections
        .into_iter()
        .map(|(source, config)| compile_and_render(source, config))
        .collect()
}

/// Lifecycle of a section preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// Nothing has been rendered yet.
    Idle,
    /// Source is being compiled.
    Compiling,
    /// The compiled component is being rendered.
    Rendering,
    /// A render tree is on display.
    Displayed,
    /// An error panel is on display.
    ErrorDisplayed,
}

/// The last inputs and their result.
#[derive(Debug, Clone)]
struct Memo {
    /// Source the result was produced from.
    source: String,
    /// Config the result was produced with.
    config: SectionConfig,
    /// The result.
    result: RenderResult,
}

/// Live preview of one section, memoised on `(source, config)`.
#[derive(Debug)]
pub struct Preview {
    /// Current lifecycle state.
    state: PreviewState,
    /// Most recent inputs and result.
    memo: Option<Memo>,
    /// Compiles performed so far.
    compiles: usize,
}

impl Default for Preview {
    fn default() -> Self {
        Self::new()
    }
}

impl Preview {
    /// A preview in the idle state.
    pub fn new() -> Self {
        Self {
            state: PreviewState::Idle,
            memo: None,
            compiles: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PreviewState {
        self.state
    }

    /// The result currently on display.
    pub fn result(&self) -> Option<&RenderResult> {
        self.memo.as_ref().map(|m| &m.result)
    }

    /// Number of compiles performed. Memo hits do not compile.
    pub fn compiles(&self) -> usize {
        self.compiles
    }

    /// Drop the displayed result and return to idle.
    pub fn reset(&mut self) {
        self.memo = None;
        self.transition(PreviewState::Idle);
    }

    /// Show `source` rendered with `config`. Identical inputs return the cached result.
    pub fn update(&mut self, source: &str, config: &SectionConfig) -> &RenderResult {
        let memo = match self.memo.take() {
            Some(memo) if memo.source == source && memo.config == *config => memo,
            _ => Memo {
                result: self.run(source, config),
                source: source.to_string(),
                config: config.clone(),
            },
        };
        &self.memo.insert(memo).result
    }

    /// Compile and render, walking the state machine.
    fn run(&mut self, source: &str, config: &SectionConfig) -> RenderResult {
        self.transition(PreviewState::Compiling);
        self.compiles += 1;
        let component = match compile_guarded(source, config) {
            Ok(component) => component,
            Err(failure) => {
                self.transition(PreviewState::ErrorDisplayed);
                return RenderResult::Failed(failure);
            }
        };
        self.transition(PreviewState::Rendering);
        let result = render(&component, config);
        self.transition(if result.is_rendered() {
            PreviewState::Displayed
        } else {
            PreviewState::ErrorDisplayed
        });
        result
    }

    /// Move to `next`.
    fn transition(&mut self, next: PreviewState) {
        debug!(from = ?self.state, to = ?next, "preview state");
        self.state = next;
    }
}
