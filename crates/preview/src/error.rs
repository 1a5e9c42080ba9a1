//! Error types for compiling and rendering section components.

use std::fmt::Write as _;

use thiserror::Error;

/// Which half of the pipeline produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Preprocessing, parsing, scope binding, or the first evaluation of the source.
    Compile,
    /// Instantiating or rendering a component that compiled successfully.
    Runtime,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while compiling or rendering a section component.
pub enum Error {
    #[error("{message}")]
    /// The source failed to produce a component: a syntax error, an identifier missing from the
    /// scope, or an error raised while the source expression was first evaluated.
    Compile {
        /// Optional 1-based line number in the operator's source.
        line: Option<usize>,
        /// Optional 1-based column number.
        col: Option<usize>,
        /// Human-readable error message.
        message: String,
        /// Optional excerpt including a caret at the error location.
        excerpt: Option<String>,
    },
    #[error("{message}")]
    /// The compiled component raised an error while rendering.
    Runtime {
        /// Optional 1-based line number in the operator's source.
        line: Option<usize>,
        /// Optional 1-based column number.
        col: Option<usize>,
        /// Human-readable error message.
        message: String,
        /// Optional excerpt including a caret at the error location.
        excerpt: Option<String>,
        /// Script call frames, outermost first.
        trace: Vec<String>,
    },
    #[error("component source must evaluate to a function, got {type_name}")]
    /// The source evaluated cleanly, but not to something callable.
    NotAComponent {
        /// Script type name of the value the source produced.
        type_name: String,
    },
    #[error("invalid scope: {message}")]
    /// The scope cannot be bound as a parameter list.
    InvalidScope {
        /// Human-readable error message.
        message: String,
    },
    #[error("invalid section config: {message}")]
    /// A section config could not be converted for the script engine.
    Config {
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Runtime { .. } => Stage::Runtime,
            Self::Compile { .. }
            | Self::NotAComponent { .. }
            | Self::InvalidScope { .. }
            | Self::Config { .. } => Stage::Compile,
        }
    }

    /// True for every failure that prevented a component from being produced.
    pub fn is_compile(&self) -> bool {
        self.stage() == Stage::Compile
    }

    /// Render a human-friendly error message including location, excerpt and call trace.
    pub fn pretty(&self) -> String {
        match self {
            Self::Compile {
                line,
                col,
                message,
                excerpt,
            } => located("Compile error", *line, *col, message, excerpt.as_deref()),
            Self::Runtime {
                line,
                col,
                message,
                excerpt,
                trace,
            } => {
                let mut out = located("Runtime error", *line, *col, message, excerpt.as_deref());
                if !trace.is_empty() {
                    out.push_str("\nCall trace:");
                    for frame in trace {
                        let _ignored = write!(out, "\n  {}", frame);
                    }
                }
                out
            }
            Self::NotAComponent { .. } | Self::InvalidScope { .. } | Self::Config { .. } => {
                format!("Compile error\n{}", self)
            }
        }
    }
}

/// Format a titled diagnostic with an optional `line:col` and excerpt.
fn located(
    title: &str,
    line: Option<usize>,
    col: Option<usize>,
    message: &str,
    excerpt: Option<&str>,
) -> String {
    let loc = match (line, col) {
        (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    };
    match excerpt {
        Some(ex) if !loc.is_empty() => format!("{}{}\n{}\n{}", title, loc, message, ex.trim_end()),
        _ => format!("{}{}\n{}", title, loc, message),
    }
}

/// Width of the ` NNNN | ` gutter in front of each excerpt line.
const GUTTER: usize = 8;

/// Source excerpt around `line_no`: up to two lines before and one after, with a caret under
/// `col_no`. Lines past the end of the source are omitted.
pub fn excerpt_at(source: &str, line_no: usize, col_no: usize) -> String {
    let first = line_no.saturating_sub(2).max(1);
    let count = (line_no + 2).saturating_sub(first);
    let mut out = String::new();
    let lines = source.lines().enumerate().map(|(i, t)| (i + 1, t));
    for (n, text) in lines.skip(first - 1).take(count) {
        out += &format!(" {:>4} | {}\n", n, text);
        if n == line_no {
            out += &" ".repeat(GUTTER + col_no.saturating_sub(1));
            out += "^\n";
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_points_at_column() {
        let ex = excerpt_at("one\ntwo\nthree", 2, 3);
        assert!(ex.contains("    2 | two"));
        let caret = ex.lines().nth(2).expect("caret line");
        assert_eq!(caret.trim_end(), format!("{}^", " ".repeat(10)));
    }

    #[test]
    fn excerpt_clips_to_the_source() {
        let ex = excerpt_at("only", 1, 1);
        assert_eq!(ex, "    1 | only\n        ^\n");
        assert_eq!(excerpt_at("a\nb", 5, 1), "");
    }

    #[test]
    fn pretty_includes_trace() {
        let err = Error::Runtime {
            line: Some(3),
            col: Some(5),
            message: "boom".to_string(),
            excerpt: None,
            trace: vec!["in component closure".to_string()],
        };
        let text = err.pretty();
        assert!(text.starts_with("Runtime error at line 3, column 5\nboom"));
        assert!(text.ends_with("Call trace:\n  in component closure"));
        assert_eq!(err.stage(), Stage::Runtime);
    }

    #[test]
    fn shape_errors_are_compile_stage() {
        let err = Error::NotAComponent {
            type_name: "i64".to_string(),
        };
        assert!(err.is_compile());
        assert!(err.pretty().contains("must evaluate to a function"));
    }
}
