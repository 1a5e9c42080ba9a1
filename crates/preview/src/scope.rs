//! Ordered binding tables handed to compiled components.

use rhai::Dynamic;

use crate::{Error, dsl::ElementFactory, icons::icon_set, section::SectionConfig};

/// Words that cannot be used as binding names because the script parser claims them.
const RESERVED: &[&str] = &[
    "as", "break", "call", "catch", "const", "continue", "curry", "debug", "default", "do", "else",
    "eval", "export", "false", "fn", "for", "global", "if", "import", "in", "is_def_fn",
    "is_def_var", "is_shared", "let", "loop", "print", "private", "return", "static", "switch",
    "this", "throw", "true", "try", "type_of", "until", "var", "while", "Fn",
];

/// An ordered sequence of `(name, value)` bindings.
///
/// Insertion order is the parameter order of the compiled component. Pushing a name that is
/// already bound replaces its value without moving it.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Bindings in order.
    entries: Vec<(String, Dynamic)>,
}

impl Scope {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard scope for rendering a section: `h`, `className`, every icon, then `config`.
    pub fn standard(config: &SectionConfig) -> Result<Self, Error> {
        let mut scope = Self::new();
        scope.push("h", Dynamic::from(ElementFactory));
        scope.push("className", Dynamic::from(String::new()));
        for icon in icon_set() {
            scope.push(icon.name(), Dynamic::from(icon));
        }
        scope.push("config", config.to_dynamic()?);
        Ok(scope)
    }

    /// Bind `name`, replacing any previous value in place.
    pub fn push(&mut self, name: impl Into<String>, value: Dynamic) -> &mut Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Dynamic> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Binding names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Binding values in order, cloned for a call.
    pub fn values(&self) -> Vec<Dynamic> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every name can be declared as a script parameter.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, _) in &self.entries {
            if !is_identifier(name) {
                return Err(Error::InvalidScope {
                    message: format!("'{}' is not a valid identifier", name),
                });
            }
            if RESERVED.contains(&name.as_str()) {
                return Err(Error::InvalidScope {
                    message: format!("'{}' is a reserved word", name),
                });
            }
        }
        Ok(())
    }
}

impl<N: Into<String>> FromIterator<(N, Dynamic)> for Scope {
    fn from_iter<I: IntoIterator<Item = (N, Dynamic)>>(iter: I) -> Self {
        let mut scope = Self::new();
        for (name, value) in iter {
            scope.push(name, value);
        }
        scope
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::icons::ICON_NAMES;

    #[test]
    fn standard_scope_order() {
        let cfg = SectionConfig::from_value(json!({"heading": "Hi"})).expect("cfg");
        let scope = Scope::standard(&cfg).expect("scope");
        let names: Vec<&str> = scope.names().collect();
        assert_eq!(names[0], "h");
        assert_eq!(names[1], "className");
        assert_eq!(&names[2..2 + ICON_NAMES.len()], ICON_NAMES);
        assert_eq!(names.last(), Some(&"config"));
        assert_eq!(scope.len(), ICON_NAMES.len() + 3);
        assert!(scope.get("className").is_some_and(|v| v.is_string()));
        scope.validate().expect("valid");
    }

    #[test]
    fn rebinding_keeps_position() {
        let mut scope: Scope = [("a", Dynamic::from(1_i64)), ("b", Dynamic::from(2_i64))]
            .into_iter()
            .collect();
        scope.push("a", Dynamic::from(9_i64));
        assert_eq!(scope.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(scope.get("a").and_then(|v| v.as_int().ok()), Some(9));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut scope = Scope::new();
        scope.push("my-thing", Dynamic::UNIT);
        assert!(matches!(scope.validate(), Err(Error::InvalidScope { .. })));

        let mut scope = Scope::new();
        scope.push("let", Dynamic::UNIT);
        assert!(matches!(scope.validate(), Err(Error::InvalidScope { .. })));
    }
}
