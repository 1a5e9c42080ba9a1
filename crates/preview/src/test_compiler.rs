#[cfg(test)]
mod tests {
    use rhai::{Dynamic, Map};
    use serde_json::json;

    use crate::{
        Error, Scope, SectionConfig, Stage, compile, compile_and_render, strip_module_syntax,
    };

    fn config() -> SectionConfig {
        SectionConfig::from_value(json!({"heading": "Hello"})).expect("config")
    }

    fn compile_standard(source: &str) -> Result<crate::CompiledComponent, Error> {
        let scope = Scope::standard(&config()).expect("scope");
        compile(source, &scope)
    }

    #[test]
    fn strips_imports_and_export_default() {
        let source = "import React from 'react';\nimport { Star } from 'lucide-react';\n\nexport default |props| h.text(\"x\");\n";
        assert_eq!(strip_module_syntax(source), "|props| h.text(\"x\")");
    }

    #[test]
    fn import_stripping_is_textual() {
        // The transform does not understand string literals.
        let source = "|props| h.text(\"import a from b; done\")";
        assert_eq!(strip_module_syntax(source), "|props| h.text(\" done\")");
        // Script-style imports have no `from` and are left for the parser to reject.
        assert_eq!(strip_module_syntax("import \"x\" as x;"), "import \"x\" as x");
        // Nor word boundaries: the match may start and end inside identifiers.
        assert_eq!(strip_module_syntax("reimport x fromage;"), "re");
    }

    #[test]
    fn compiles_against_custom_scope() {
        let mut scope = Scope::new();
        scope.push("greeting", Dynamic::from("hello".to_string()));
        let component = compile("|props| greeting + \" \" + props.name", &scope).expect("compiles");

        let mut props = Map::new();
        props.insert("name".into(), Dynamic::from("world".to_string()));
        let value = component.call(Dynamic::from_map(props)).expect("calls");
        assert_eq!(value.into_string().expect("string"), "hello world");
    }

    #[test]
    fn same_inputs_render_identically() {
        let source = r#"|props| h.el("div", #{ "class": "p-4" }, [props.config.heading, " ", config.heading])"#;
        let first = compile_and_render(source, &config());
        let second = compile_and_render(source, &config());
        assert!(first.is_rendered());
        assert_eq!(first, second);
        assert_eq!(first.to_html(), "<div class=\"p-4\">Hello Hello</div>");
    }

    #[test]
    fn unbound_identifier_is_a_compile_error() {
        let err = compile_standard("|props| h.el(\"div\", (), [\n    Foo\n])").expect_err("unbound");
        assert_eq!(err.stage(), Stage::Compile);
        match err {
            Error::Compile {
                line,
                message,
                excerpt,
                ..
            } => {
                assert!(message.contains("Foo"), "message was {message}");
                assert_eq!(line, Some(2));
                assert!(excerpt.is_some_and(|e| e.contains("Foo")));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn error_lines_account_for_stripped_prefix() {
        let source = "import React from 'react';\n\n|props| h.el(\"div\", (), [\n  missing\n])";
        match compile_standard(source) {
            Err(Error::Compile { line, .. }) => assert_eq!(line, Some(4)),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn syntax_errors_are_compile_errors() {
        let err = compile_standard("|props| h.el(\"div\", ").expect_err("syntax");
        assert!(matches!(err, Error::Compile { .. }));
        assert!(err.pretty().starts_with("Compile error"));
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = compile_standard("export default ;").expect_err("empty");
        assert_eq!(err.to_string(), "component source is empty");
    }

    #[test]
    fn non_callable_source_is_not_a_component() {
        match compile_standard("40 + 2") {
            Err(Error::NotAComponent { type_name }) => assert_eq!(type_name, "i64"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn errors_during_first_evaluation_are_compile_stage() {
        let err = compile_standard("h.el(\"bad tag\")").expect_err("bad tag");
        match err {
            Error::Compile { message, .. } => assert_eq!(message, "invalid element tag 'bad tag'"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_functions_fail_at_render() {
        let result = compile_and_render("|props| frobnicate(1)", &config());
        let failure = result.failure().expect("failure");
        assert_eq!(failure.stage, Stage::Runtime);
        assert!(failure.message.contains("frobnicate"), "message was {}", failure.message);
    }

    #[test]
    fn runaway_scripts_hit_the_operation_limit() {
        let result = compile_and_render("|props| { loop { } }", &config());
        let failure = result.failure().expect("failure");
        assert_eq!(failure.stage, Stage::Runtime);
        assert!(failure.detail.starts_with("Runtime error"));
    }

    #[test]
    fn module_imports_and_eval_are_unavailable() {
        assert!(compile_standard("import \"std\" as s;").is_err());
        let result = compile_and_render("|props| eval(\"40 + 2\")", &config());
        assert!(!result.is_rendered());
    }

    #[test]
    fn invalid_scope_names_are_rejected() {
        let mut scope = Scope::new();
        scope.push("not valid", Dynamic::UNIT);
        assert!(matches!(
            compile("|props| 1", &scope),
            Err(Error::InvalidScope { .. })
        ));
    }

    #[test]
    fn each_compile_is_independent() {
        let a = compile_standard("|props| h.text(\"a\")").expect("a");
        let b = compile_standard("|props| h.text(\"b\")").expect("b");
        let text = |c: &crate::CompiledComponent| {
            c.call(Dynamic::UNIT)
                .expect("call")
                .cast::<crate::Node>()
                .text_content()
        };
        assert_eq!(text(&a), "a");
        assert_eq!(text(&b), "b");
        assert_eq!(a.source(), "|props| h.text(\"a\")");
    }
}
