//! Errors raised by the `h` primitives.
//!
//! Primitive failures travel through the engine as `ErrorRuntime` payloads. Tagging them with
//! [`PrimitiveError`] lets the compiler recover the original message and call position instead
//! of the engine's generic wrapper text.

use std::{error::Error as StdError, fmt};

use rhai::{Dynamic, EvalAltResult, Position};

/// Message from a rendering primitive, e.g. an unknown icon or an invalid tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveError(String);

impl fmt::Display for PrimitiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for PrimitiveError {}

/// Raise `message` at `pos` from inside a primitive.
pub(crate) fn boxed_primitive_error(message: String, pos: Position) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(Dynamic::from(PrimitiveError(message)), pos).into()
}

/// Find the primitive error at the bottom of `err`, looking through call frames.
pub(crate) fn extract_primitive_error(err: &EvalAltResult) -> Option<(Position, String)> {
    let mut current = err;
    loop {
        match current {
            EvalAltResult::ErrorRuntime(payload, pos) => {
                return payload
                    .read_lock::<PrimitiveError>()
                    .map(|e| (*pos, e.0.clone()));
            }
            EvalAltResult::ErrorInFunctionCall(_, _, inner, _)
            | EvalAltResult::ErrorInModule(_, inner, _) => current = inner,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_errors_survive_call_frames() {
        let pos = Position::new(3, 7);
        let leaf = boxed_primitive_error("unknown icon 'X'".to_string(), pos);
        let wrapped = EvalAltResult::ErrorInFunctionCall(
            "section_component".to_string(),
            String::new(),
            leaf,
            Position::new(1, 1),
        );
        assert_eq!(
            extract_primitive_error(&wrapped),
            Some((pos, "unknown icon 'X'".to_string()))
        );
    }

    #[test]
    fn other_runtime_errors_are_not_primitive() {
        let err = EvalAltResult::ErrorRuntime(Dynamic::from("plain".to_string()), Position::NONE);
        assert_eq!(extract_primitive_error(&err), None);
    }
}
