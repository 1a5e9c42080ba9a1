//! Render tree produced by section components, and its HTML serialisation.

use std::fmt::Write as _;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta", "source"];

/// One node of a rendered section.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An HTML element.
    Element(Element),
    /// Escaped text content.
    Text(String),
    /// An icon symbol placeholder.
    Icon {
        /// Icon symbol name.
        name: String,
        /// Optional pixel size.
        size: Option<i64>,
        /// Optional class string, passed through verbatim.
        class: Option<String>,
    },
    /// A list of siblings without a wrapping element.
    Fragment(Vec<Node>),
}

/// An element with attributes, inline style and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Class string, passed through verbatim.
    pub class: Option<String>,
    /// Remaining attributes in declaration order. An empty value renders as a bare attribute.
    pub attrs: Vec<(String, String)>,
    /// Inline style declarations (kebab-case property, value).
    pub style: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Inline style value by kebab-case property name.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }
}

impl Node {
    /// Serialise the tree to an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Append the HTML for this node to `out`.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => escape_into(text, out),
            Self::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Self::Icon { name, size, class } => {
                out.push_str("<svg data-icon=\"");
                escape_into(name, out);
                out.push('"');
                if let Some(class) = class {
                    out.push_str(" class=\"");
                    escape_into(class, out);
                    out.push('"');
                }
                let px = size.unwrap_or(24);
                let _ignored = write!(out, " width=\"{px}\" height=\"{px}\" aria-hidden=\"true\"></svg>");
            }
            Self::Element(el) => write_element(el, out),
        }
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Append text content of the subtree to `out`.
    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Icon { .. } => {}
            Self::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Depth-first search for the first element matching `pred`.
    pub fn find_element(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        match self {
            Self::Element(el) if pred(el) => Some(el),
            Self::Element(el) => el.children.iter().find_map(|c| c.find_element(pred)),
            Self::Fragment(children) => children.iter().find_map(|c| c.find_element(pred)),
            Self::Text(_) | Self::Icon { .. } => None,
        }
    }

    /// First element with the given tag.
    pub fn find_tag(&self, tag: &str) -> Option<&Element> {
        self.find_element(&|el| el.tag == tag)
    }

    /// Names of all icons in the subtree, in document order.
    pub fn icon_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_icons(&mut out);
        out
    }

    /// Append icon names of the subtree to `out`.
    fn collect_icons<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Icon { name, .. } => out.push(name),
            Self::Text(_) => {}
            Self::Fragment(children) => children.iter().for_each(|c| c.collect_icons(out)),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_icons(out)),
        }
    }
}

/// Write an element with its attributes and children.
fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    if let Some(class) = &el.class {
        out.push_str(" class=\"");
        escape_into(class, out);
        out.push('"');
    }
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            escape_into(value, out);
            out.push('"');
        }
    }
    if !el.style.is_empty() {
        let decls: Vec<String> = el
            .style
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        out.push_str(" style=\"");
        escape_into(&decls.join("; "), out);
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return;
    }
    for child in &el.children {
        child.write_html(out);
    }
    let _ignored = write!(out, "</{}>", el.tag);
}

/// Escape text for use in HTML content and double-quoted attribute values.
pub fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// Escape text for HTML, returning a new string.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

/// Convert a camelCase style property to kebab-case (`backgroundColor` -> `background-color`).
pub fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading() -> Node {
        let mut h1 = Element::new("h1");
        h1.class = Some("text-5xl md:text-7xl".to_string());
        h1.style.push(("color".to_string(), "#fff".to_string()));
        h1.children.push(Node::Text("Fish & <Chips>".to_string()));
        Node::Element(h1)
    }

    #[test]
    fn html_escapes_text_and_keeps_classes() {
        assert_eq!(
            heading().to_html(),
            "<h1 class=\"text-5xl md:text-7xl\" style=\"color: #fff\">Fish &amp; &lt;Chips&gt;</h1>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let mut img = Element::new("img");
        img.attrs.push(("src".to_string(), "a.png".to_string()));
        img.attrs.push(("hidden".to_string(), String::new()));
        assert_eq!(Node::Element(img).to_html(), "<img src=\"a.png\" hidden>");
    }

    #[test]
    fn queries_walk_fragments() {
        let tree = Node::Fragment(vec![
            Node::Icon {
                name: "Star".to_string(),
                size: Some(16),
                class: None,
            },
            heading(),
        ]);
        assert_eq!(tree.text_content(), "Fish & <Chips>");
        assert_eq!(tree.find_tag("h1").and_then(|h| h.style_value("color")), Some("#fff"));
        assert_eq!(tree.icon_names(), vec!["Star"]);
        assert!(tree.to_html().starts_with("<svg data-icon=\"Star\" width=\"16\""));
    }

    #[test]
    fn kebab_case_style_names() {
        assert_eq!(kebab_case("backgroundImage"), "background-image");
        assert_eq!(kebab_case("opacity"), "opacity");
    }
}
