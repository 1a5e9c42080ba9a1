//! Turn section source text into a callable component.
//!
//! The source is a single Rhai expression, usually a closure `|props| h.el(...)`. It is wrapped
//! in a synthesised script function whose parameters are the scope names, in order:
//!
//! ```text
//! fn section_component(h, className, ArrowRight, ..., config) {
//!     return (
//! <source>
//!     );
//! }
//! ```
//!
//! Calling that function with the scope values yields the component. The engine runs with
//! strict variables, so any identifier the scope does not bind is rejected at parse time.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use regex::Regex;
use rhai::{
    AST, Dynamic, Engine, EvalAltResult, FnPtr, Position, Scope as EngineScope,
    module_resolvers::DummyModuleResolver,
};
use tracing::{debug, info};

use crate::{
    Error, Scope,
    dsl::register_primitives,
    error::{Stage, excerpt_at},
    validation::extract_primitive_error,
};

/// Operation budget for a single compile or render.
pub const MAX_OPERATIONS: u64 = 500_000;
/// Maximum script call depth.
pub const MAX_CALL_LEVELS: usize = 64;
/// Maximum expression nesting at global level.
pub const MAX_EXPR_DEPTH: usize = 256;
/// Maximum expression nesting inside functions and closures.
pub const MAX_FN_EXPR_DEPTH: usize = 256;
/// Maximum length of any script string, in bytes.
pub const MAX_STRING_SIZE: usize = 1 << 20;
/// Maximum number of items in a script array.
pub const MAX_ARRAY_SIZE: usize = 10_000;
/// Maximum number of entries in a script object map.
pub const MAX_MAP_SIZE: usize = 10_000;

/// Name of the synthesised wrapper function.
const ENTRY: &str = "section_component";
/// Lines of wrapper that precede the first line of the source.
const WRAPPER_LINES: usize = 2;

/// `import ... from ... ;` on a single line.
fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"import.*?from.*?;")
            .unwrap_or_else(|e| panic!("invalid import pattern: {}", e))
    })
}

/// `export default` prefix.
fn export_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bexport\s+default\s+")
            .unwrap_or_else(|e| panic!("invalid export pattern: {}", e))
    })
}

/// Remove module syntax from a component source, leaving the bare expression.
///
/// This is a textual transform: `import`, then `from`, then `;` on one line is dropped wherever
/// it appears, string literals and identifiers such as `reimport` included.
pub fn strip_module_syntax(source: &str) -> String {
    Prepared::new(source).body
}

/// A preprocessed source plus what is needed to map wrapper positions back to it.
#[derive(Debug, Clone)]
struct Prepared {
    /// The expression placed inside the wrapper.
    body: String,
    /// Blank lines trimmed from the top of the source.
    skipped_lines: usize,
    /// Columns trimmed from the start of the first body line.
    first_col_offset: usize,
}

impl Prepared {
    /// Strip module syntax and record how much leading text was trimmed.
    fn new(source: &str) -> Self {
        let without_imports = import_re().replace_all(source, "");
        let stripped = export_re().replace_all(&without_imports, "");

        let leading = stripped.len() - stripped.trim_start().len();
        let prefix = &stripped[..leading];
        let skipped_lines = prefix.matches('\n').count();
        let first_col_offset = prefix.rsplit('\n').next().map_or(0, |s| s.chars().count());

        let mut body = stripped.trim();
        if let Some(rest) = body.strip_suffix(';') {
            body = rest.trim_end();
        }
        Self {
            body: body.to_string(),
            skipped_lines,
            first_col_offset,
        }
    }

    /// Number of lines in the body.
    fn body_lines(&self) -> usize {
        self.body.lines().count().max(1)
    }

    /// The full wrapper script for `scope`.
    fn wrap(&self, scope: &Scope) -> String {
        let params: Vec<&str> = scope.names().collect();
        format!(
            "fn {}({}) {{\n    return (\n{}\n    );\n}}\n",
            ENTRY,
            params.join(", "),
            self.body
        )
    }

    /// Map a wrapper position to a 1-based `(line, col)` in the operator's source.
    fn remap(&self, pos: Position) -> Option<(usize, usize)> {
        let line = pos.line()?;
        if line <= WRAPPER_LINES {
            return None;
        }
        let body_line = (line - WRAPPER_LINES).min(self.body_lines());
        let mut col = pos.position().unwrap_or(1).max(1);
        if body_line == 1 {
            col += self.first_col_offset;
        }
        Some((body_line + self.skipped_lines, col))
    }

    /// Describe one script call frame.
    fn frame(&self, name: &str, pos: Position) -> String {
        let what = if name == ENTRY {
            "in component source".to_string()
        } else if name.starts_with("anon$") {
            "in anonymous function".to_string()
        } else {
            format!("in function '{}'", name)
        };
        match self.remap(pos) {
            Some((line, col)) => format!("{} (called at line {}, column {})", what, line, col),
            None => what,
        }
    }

    /// Convert an engine error into a stage-tagged error against `source`.
    fn error(&self, source: &str, err: &EvalAltResult, stage: Stage) -> Error {
        let mut trace = Vec::new();
        let mut leaf = err;
        while let EvalAltResult::ErrorInFunctionCall(name, _, inner, pos) = leaf {
            trace.push(self.frame(name, *pos));
            leaf = inner;
        }

        let (pos, message) = extract_primitive_error(leaf)
            .unwrap_or_else(|| (leaf.position(), strip_position(&leaf.to_string())));
        let (line, col, excerpt) = match self.remap(pos) {
            Some((line, col)) => (Some(line), Some(col), Some(excerpt_at(source, line, col))),
            None => (None, None, None),
        };

        match stage {
            Stage::Compile => Error::Compile {
                line,
                col,
                message,
                excerpt,
            },
            Stage::Runtime => Error::Runtime {
                line,
                col,
                message,
                excerpt,
                trace,
            },
        }
    }
}

/// Drop the trailing ` (line x, position y)` the engine appends to messages.
fn strip_position(message: &str) -> String {
    match message.rfind(" (line ") {
        Some(idx) if message.ends_with(')') => message[..idx].to_string(),
        _ => message.to_string(),
    }
}

/// A fresh, locked-down engine with the rendering primitives registered.
pub(crate) fn new_engine() -> Engine {
    let mut engine = Engine::new();
    engine.on_print(|s| info!(target: "preview::script", "{}", s));
    engine.on_debug(|s, src, pos| {
        debug!(target: "preview::script", "{} @ {:?}:{:?}", s, src, pos);
    });

    engine.set_strict_variables(true);
    engine.set_module_resolver(DummyModuleResolver::new());
    engine.disable_symbol("eval");

    engine.set_max_operations(MAX_OPERATIONS);
    engine.set_max_call_levels(MAX_CALL_LEVELS);
    engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_FN_EXPR_DEPTH);
    engine.set_max_string_size(MAX_STRING_SIZE);
    engine.set_max_array_size(MAX_ARRAY_SIZE);
    engine.set_max_map_size(MAX_MAP_SIZE);

    register_primitives(&mut engine);
    engine
}

/// A component ready to be rendered. Owns the engine and AST it was compiled with.
pub struct CompiledComponent {
    /// Engine the component was compiled with.
    engine: Engine,
    /// Compiled wrapper script.
    ast: AST,
    /// The component closure.
    component: FnPtr,
    /// Operator source, for diagnostics.
    source: Arc<str>,
    /// Position mapping for diagnostics.
    prepared: Prepared,
}

impl fmt::Debug for CompiledComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledComponent")
            .field("component", &self.component.fn_name())
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl CompiledComponent {
    /// Invoke the component with a props value.
    pub fn call(&self, props: Dynamic) -> Result<Dynamic, Error> {
        self.component
            .call::<Dynamic>(&self.engine, &self.ast, (props,))
            .map_err(|err| self.prepared.error(&self.source, &err, Stage::Runtime))
    }

    /// The operator source this component was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Compile `source` against `scope`.
///
/// Every failure, from preprocessing to the first evaluation of the source expression, is a
/// compile-stage error. The returned component is not shared with any other compile.
pub fn compile(source: &str, scope: &Scope) -> Result<CompiledComponent, Error> {
    scope.validate()?;
    let prepared = Prepared::new(source);
    if prepared.body.is_empty() {
        return Err(Error::Compile {
            line: None,
            col: None,
            message: "component source is empty".to_string(),
            excerpt: None,
        });
    }

    let engine = new_engine();
    let script = prepared.wrap(scope);
    let ast = engine.compile(&script).map_err(|err| {
        let err: EvalAltResult = err.into();
        prepared.error(source, &err, Stage::Compile)
    })?;

    let value = engine
        .call_fn::<Dynamic>(&mut EngineScope::new(), &ast, ENTRY, scope.values())
        .map_err(|err| prepared.error(source, &err, Stage::Compile))?
        .flatten();
    if !value.is::<FnPtr>() {
        return Err(Error::NotAComponent {
            type_name: engine.map_type_name(value.type_name()).to_string(),
        });
    }
    let component = value.cast::<FnPtr>();
    debug!(
        params = scope.len(),
        lines = prepared.body_lines(),
        "compiled section component"
    );

    Ok(CompiledComponent {
        engine,
        ast,
        component,
        source: Arc::from(source),
        prepared,
    })
}
