#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        Preview, PreviewState, RenderResult, SectionConfig, SectionKind, Stage,
        compile_and_render, render_page, templates::generate,
    };

    fn hero(heading: &str, overlay: i64) -> SectionConfig {
        SectionConfig::from_value(json!({
            "heading": heading,
            "subtitle": "Sub",
            "buttonText": "Go",
            "backgroundImage": "https://example.com/a.jpg",
            "textColor": "#ffffff",
            "overlayOpacity": overlay
        }))
        .expect("config")
    }

    const BROKEN: &str = "|props| h.el(\"div\", (), [UnknownThing])";

    #[test]
    fn hero_preview_shows_heading_and_overlay() {
        let config = hero("Test Title", 40);
        let code = generate(SectionKind::Hero, &config);

        let mut preview = Preview::new();
        let result = preview.update(&code, &config).clone();
        assert_eq!(preview.state(), PreviewState::Displayed);

        let node = result.node().expect("rendered");
        assert_eq!(node.find_tag("h1").map(node_text), Some("Test Title".to_string()));
        let overlay = node
            .find_element(&|el| el.class.as_deref() == Some("absolute inset-0 bg-black"))
            .expect("overlay");
        assert_eq!(overlay.style_value("opacity"), Some("0.4"));
        let section = node.find_tag("section").expect("section");
        assert_eq!(
            section.style_value("background-image"),
            Some("url(https://example.com/a.jpg)")
        );
    }

    fn node_text(el: &crate::Element) -> String {
        crate::Node::Element(el.clone()).text_content()
    }

    #[test]
    fn unknown_identifier_displays_an_error_panel() {
        let mut preview = Preview::new();
        let result = preview.update(BROKEN, &SectionConfig::new()).clone();
        assert_eq!(preview.state(), PreviewState::ErrorDisplayed);

        let failure = result.failure().expect("failure");
        assert_eq!(failure.stage, Stage::Compile);
        assert!(failure.message.contains("UnknownThing"));

        let html = result.to_html();
        assert!(html.contains("Component Error"));
        assert!(html.contains("<details"));
        assert!(html.contains("data-stage=\"compile\""));
    }

    #[test]
    fn identical_inputs_do_not_recompile() {
        let config = hero("Memo", 10);
        let code = generate(SectionKind::Hero, &config);
        let mut preview = Preview::new();
        assert_eq!(preview.state(), PreviewState::Idle);

        let first = preview.update(&code, &config).clone();
        let second = preview.update(&code, &config).clone();
        assert_eq!(preview.compiles(), 1);
        assert_eq!(first, second);

        let changed = hero("Memo 2", 10);
        preview.update(&code, &changed);
        assert_eq!(preview.compiles(), 2);
    }

    #[test]
    fn preview_recovers_after_an_error() {
        let config = hero("Back", 0);
        let mut preview = Preview::new();
        preview.update(BROKEN, &config);
        assert_eq!(preview.state(), PreviewState::ErrorDisplayed);

        preview.update(&generate(SectionKind::Hero, &config), &config);
        assert_eq!(preview.state(), PreviewState::Displayed);

        preview.update("|props| h.el(\"div\", (), [frob()])", &config);
        assert_eq!(preview.state(), PreviewState::ErrorDisplayed);
        assert_eq!(
            preview.result().and_then(RenderResult::failure).map(|f| f.stage),
            Some(Stage::Runtime)
        );

        preview.reset();
        assert_eq!(preview.state(), PreviewState::Idle);
        assert!(preview.result().is_none());
    }

    #[test]
    fn one_broken_section_does_not_affect_others() {
        let hero_config = hero("Page", 20);
        let hero_code = generate(SectionKind::Hero, &hero_config);
        let footer_config = crate::templates::default_config(SectionKind::Footer);
        let footer_code = generate(SectionKind::Footer, &footer_config);
        let empty = SectionConfig::new();

        let results = render_page([
            (hero_code.as_str(), &hero_config),
            (BROKEN, &empty),
            (footer_code.as_str(), &footer_config),
        ]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_rendered());
        assert!(!results[1].is_rendered());
        assert!(results[2].is_rendered());
    }

    #[test]
    fn unrenderable_return_values_fail_at_runtime() {
        let result = compile_and_render("|props| #{ a: 1 }", &SectionConfig::new());
        let failure = result.failure().expect("failure");
        assert_eq!(failure.stage, Stage::Runtime);
        assert!(failure.message.contains("cannot be rendered"));
    }

    #[test]
    fn rendering_leaves_inputs_untouched() {
        let config = hero("Same", 30);
        let before = config.clone();
        let code = generate(SectionKind::Hero, &config);
        let code_before = code.clone();
        let _rendered = compile_and_render(&code, &config);
        assert_eq!(config, before);
        assert_eq!(code, code_before);
    }

    #[test]
    fn component_mutating_props_does_not_leak() {
        let config = hero("Original", 30);
        let source = "|props| { props.config.heading = \"Changed\"; h.text(props.config.heading) }";
        let result = compile_and_render(source, &config);
        assert_eq!(result.node().map(crate::Node::text_content), Some("Changed".to_string()));
        assert_eq!(config.str_or("heading", ""), "Original");
    }
}
