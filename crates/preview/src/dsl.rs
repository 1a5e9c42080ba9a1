//! The `h` rendering namespace and icon symbols exposed to component scripts.

use rhai::{Array, Dynamic, Engine, EvalAltResult, Map, NativeCallContext, Position};

use crate::{
    icons::Icon,
    node::{Element, Node, kebab_case},
    validation::{boxed_primitive_error, extract_primitive_error},
};

/// Handle bound as `h` in every scope. All primitives are methods on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFactory;

/// Register the render tree types and the `h` primitives on an engine.
pub(crate) fn register_primitives(engine: &mut Engine) {
    engine.register_type_with_name::<ElementFactory>("ElementFactory");
    engine.register_type_with_name::<Node>("Node");
    engine.register_type_with_name::<Icon>("Icon");
    engine.register_fn("to_string", |icon: &mut Icon| icon.name().to_string());
    engine.register_get("name", |icon: &mut Icon| icon.name().to_string());
    engine.register_fn("to_html", |node: &mut Node| node.to_html());

    engine.register_fn(
        "el",
        |ctx: NativeCallContext, _: ElementFactory, tag: &str| -> Result<Node, Box<EvalAltResult>> {
            element(tag, Dynamic::UNIT, Dynamic::UNIT, ctx.call_position())
        },
    );
    engine.register_fn(
        "el",
        |ctx: NativeCallContext,
         _: ElementFactory,
         tag: &str,
         props: Dynamic|
         -> Result<Node, Box<EvalAltResult>> {
            element(tag, props, Dynamic::UNIT, ctx.call_position())
        },
    );
    engine.register_fn(
        "el",
        |ctx: NativeCallContext,
         _: ElementFactory,
         tag: &str,
         props: Dynamic,
         children: Dynamic|
         -> Result<Node, Box<EvalAltResult>> {
            element(tag, props, children, ctx.call_position())
        },
    );

    engine.register_fn("text", |_: ElementFactory, value: Dynamic| {
        Node::Text(display_value(&value))
    });
    engine.register_fn(
        "fragment",
        |ctx: NativeCallContext, _: ElementFactory, children: Dynamic| -> Result<Node, Box<EvalAltResult>> {
            let mut out = Vec::new();
            collect_children(children, &mut out, ctx.call_position())?;
            Ok(Node::Fragment(out))
        },
    );

    engine.register_fn("icon", |_: ElementFactory, icon: Icon| icon_node(icon, None, None));
    engine.register_fn(
        "icon",
        |ctx: NativeCallContext, _: ElementFactory, name: &str| -> Result<Node, Box<EvalAltResult>> {
            let icon = lookup_icon(name, ctx.call_position())?;
            Ok(icon_node(icon, None, None))
        },
    );
    engine.register_fn(
        "icon",
        |ctx: NativeCallContext, _: ElementFactory, icon: Icon, props: Map| -> Result<Node, Box<EvalAltResult>> {
            icon_with_props(icon, &props, ctx.call_position())
        },
    );
    engine.register_fn(
        "icon",
        |ctx: NativeCallContext, _: ElementFactory, name: &str, props: Map| -> Result<Node, Box<EvalAltResult>> {
            let icon = lookup_icon(name, ctx.call_position())?;
            icon_with_props(icon, &props, ctx.call_position())
        },
    );
}

/// Resolve an icon by name.
fn lookup_icon(name: &str, pos: Position) -> Result<Icon, Box<EvalAltResult>> {
    Icon::named(name).ok_or_else(|| boxed_primitive_error(format!("unknown icon '{}'", name), pos))
}

/// An icon node with optional size and class.
fn icon_node(icon: Icon, size: Option<i64>, class: Option<String>) -> Node {
    Node::Icon {
        name: icon.name().to_string(),
        size,
        class,
    }
}

/// An icon node configured from a `#{size, class}` map.
fn icon_with_props(
    icon: Icon,
    props: &Map,
    pos: Position,
) -> Result<Node, Box<EvalAltResult>> {
    let size = match props.get("size") {
        None => None,
        Some(v) if v.is_unit() => None,
        Some(v) => Some(v.as_int().map_err(|ty| {
            boxed_primitive_error(format!("icon size must be an integer, got {}", ty), pos)
        })?),
    };
    let class = props
        .get("class")
        .filter(|v| !v.is_unit())
        .map(display_value);
    Ok(icon_node(icon, size, class))
}

/// Whether `tag` is an acceptable element name.
pub(crate) fn valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Build an element node, validating tag, props and children.
fn element(
    tag: &str,
    props: Dynamic,
    children: Dynamic,
    pos: Position,
) -> Result<Node, Box<EvalAltResult>> {
    if !valid_tag(tag) {
        return Err(boxed_primitive_error(format!("invalid element tag '{}'", tag), pos));
    }
    let mut el = Element::new(tag);
    if !props.is_unit() {
        let type_name = props.type_name();
        let map = props.try_cast::<Map>().ok_or_else(|| {
            boxed_primitive_error(
                format!("props for <{}> must be a map, got {}", tag, type_name),
                pos,
            )
        })?;
        apply_props(&mut el, map, pos)?;
    }
    collect_children(children, &mut el.children, pos)?;
    Ok(Node::Element(el))
}

/// Map script props onto class, style and attributes.
fn apply_props(el: &mut Element, props: Map, pos: Position) -> Result<(), Box<EvalAltResult>> {
    for (key, value) in props {
        match key.as_str() {
            "class" | "className" => {
                if !value.is_unit() {
                    el.class = Some(display_value(&value));
                }
            }
            "style" => {
                if value.is_unit() {
                    continue;
                }
                let type_name = value.type_name();
                let style = value.try_cast::<Map>().ok_or_else(|| {
                    boxed_primitive_error(format!("style must be a map, got {}", type_name), pos)
                })?;
                for (prop, v) in style {
                    if v.is_unit() {
                        continue;
                    }
                    el.style.push((kebab_case(&prop), display_value(&v)));
                }
            }
            name => {
                if !valid_attr(name) {
                    return Err(boxed_primitive_error(
                        format!("invalid attribute name '{}' on <{}>", name, el.tag),
                        pos,
                    ));
                }
                if value.is_unit() {
                    continue;
                }
                match value.as_bool() {
                    Ok(true) => el.attrs.push((name.to_string(), String::new())),
                    Ok(false) => {}
                    Err(_) => el.attrs.push((name.to_string(), display_value(&value))),
                }
            }
        }
    }
    Ok(())
}

/// Whether `name` is an acceptable attribute name.
fn valid_attr(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

/// Flatten a child value into `out`. Arrays nest, `()` and booleans render nothing.
pub(crate) fn collect_children(
    value: Dynamic,
    out: &mut Vec<Node>,
    pos: Position,
) -> Result<(), Box<EvalAltResult>> {
    if value.is_unit() || value.is::<bool>() {
        return Ok(());
    }
    if value.is_array() {
        let items: Array = value.cast();
        for item in items {
            collect_children(item, out, pos)?;
        }
        return Ok(());
    }
    if value.is::<Node>() {
        out.push(value.cast::<Node>());
        return Ok(());
    }
    if value.is::<Icon>() {
        out.push(icon_node(value.cast::<Icon>(), None, None));
        return Ok(());
    }
    if value.is_string() || value.is_int() || value.is_float() || value.is::<char>() {
        out.push(Node::Text(display_value(&value)));
        return Ok(());
    }
    Err(boxed_primitive_error(
        format!("cannot render a value of type {} as a child", value.type_name()),
        pos,
    ))
}

/// Convert the value a component returned into a render tree.
pub(crate) fn to_node(value: Dynamic) -> Result<Node, String> {
    if value.is::<Node>() {
        return Ok(value.cast::<Node>());
    }
    let mut out = Vec::new();
    collect_children(value, &mut out, Position::NONE).map_err(|err| {
        extract_primitive_error(&err)
            .map(|(_, message)| message)
            .unwrap_or_else(|| err.to_string())
    })?;
    match out.len() {
        1 => Ok(out.remove(0)),
        _ => Ok(Node::Fragment(out)),
    }
}

/// String form of a scalar script value.
fn display_value(value: &Dynamic) -> String {
    if value.is_unit() {
        return String::new();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        register_primitives(&mut engine);
        engine
    }

    fn eval(script: &str) -> Result<Node, Box<EvalAltResult>> {
        let engine = engine();
        let mut scope = rhai::Scope::new();
        scope.push("h", ElementFactory);
        scope.push("Star", Icon::named("Star").expect("icon"));
        engine.eval_with_scope::<Node>(&mut scope, script)
    }

    #[test]
    fn props_split_into_class_style_and_attrs() {
        let node = eval(
            r#"h.el("a", #{ "class": "px-4 md:py-2", "href": "/x", "style": #{ backgroundColor: "red", opacity: 0.5 }, "hidden": true, "draggable": false })"#,
        )
        .expect("render");
        let Node::Element(el) = node else {
            panic!("expected element");
        };
        assert_eq!(el.class.as_deref(), Some("px-4 md:py-2"));
        assert_eq!(el.attr("href"), Some("/x"));
        assert_eq!(el.attr("hidden"), Some(""));
        assert_eq!(el.attr("draggable"), None);
        assert_eq!(el.style_value("background-color"), Some("red"));
        assert_eq!(el.style_value("opacity"), Some("0.5"));
    }

    #[test]
    fn children_flatten_and_skip_empty_values() {
        let node = eval(r#"h.el("p", (), ["a", [1, (), false], h.icon(Star, #{ size: 16 }), h.text("b")])"#)
            .expect("render");
        assert_eq!(node.text_content(), "a1b");
        assert_eq!(node.icon_names(), vec!["Star"]);
    }

    fn message(script: &str) -> String {
        let err = eval(script).expect_err("script should fail");
        extract_primitive_error(&err)
            .map(|(_, message)| message)
            .expect("primitive error")
    }

    #[test]
    fn bad_tags_and_icons_are_runtime_errors() {
        assert_eq!(message(r#"h.el("<script>")"#), "invalid element tag '<script>'");
        assert_eq!(message(r#"h.icon("Tiktok")"#), "unknown icon 'Tiktok'");
        assert_eq!(message(r#"h.el("div", 42)"#), "props for <div> must be a map, got i64");
    }

    #[test]
    fn return_values_convert_to_nodes() {
        assert_eq!(to_node(Dynamic::UNIT), Ok(Node::Fragment(Vec::new())));
        assert_eq!(to_node(Dynamic::from("hi")), Ok(Node::Text("hi".to_string())));
        let err = to_node(Dynamic::from_map(Map::new())).expect_err("map");
        assert!(err.starts_with("cannot render a value of type"));
    }
}
