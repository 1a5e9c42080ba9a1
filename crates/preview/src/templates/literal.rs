//! Helpers for splicing config values into generated script text.

use serde_json::Value;

/// A double-quoted script string literal for `text`.
pub fn string_lit(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A string literal for a text slot. Scalars are shown as their JSON text.
pub(super) fn text(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) => string_lit(s),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => string_lit(&v.to_string()),
        _ => string_lit(fallback),
    }
}

/// Source text for a numeric slot. Strings are spliced in verbatim.
pub(super) fn number(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => fallback.to_string(),
    }
}

/// Prefix every non-empty line of `block` with `spaces` spaces.
pub(super) fn indent(block: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join script list items, one per line.
pub(super) fn items(blocks: &[String], spaces: usize) -> String {
    blocks
        .iter()
        .map(|b| indent(b, spaces))
        .collect::<Vec<_>>()
        .join(",\n")
}
