#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        Error, SectionConfig, SectionKind, Stage, compile_and_render,
        templates::{default_config, generate},
    };

    fn changed_lines(a: &str, b: &str) -> Vec<(String, String)> {
        assert_eq!(a.lines().count(), b.lines().count(), "line count changed");
        a.lines()
            .zip(b.lines())
            .filter(|(x, y)| x != y)
            .map(|(x, y)| (x.to_string(), y.to_string()))
            .collect()
    }

    #[test]
    fn generation_is_pure() {
        for kind in SectionKind::ALL {
            let config = default_config(kind);
            assert_eq!(generate(kind, &config), generate(kind, &config));
        }
    }

    #[test]
    fn one_field_changes_one_region() {
        let base = default_config(SectionKind::Hero);
        let mut edited = base.clone();
        edited.set("heading", json!("A New Heading"));

        let diff = changed_lines(
            &generate(SectionKind::Hero, &base),
            &generate(SectionKind::Hero, &edited),
        );
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].1.trim(), "\"A New Heading\"");

        let mut edited = base.clone();
        edited.set("overlayOpacity", json!(75));
        let diff = changed_lines(
            &generate(SectionKind::Hero, &base),
            &generate(SectionKind::Hero, &edited),
        );
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].1.trim(), "\"opacity\": 75 / 100.0");
    }

    #[test]
    fn missing_keys_use_sample_values() {
        for kind in SectionKind::ALL {
            assert_eq!(
                generate(kind, &SectionConfig::new()),
                generate(kind, &default_config(kind))
            );
        }
    }

    #[test]
    fn sample_sections_render() {
        for kind in SectionKind::ALL {
            let config = default_config(kind);
            let result = compile_and_render(&generate(kind, &config), &config);
            assert!(result.is_rendered(), "{kind} failed: {:?}", result.failure());
        }
    }

    #[test]
    fn quotes_in_text_survive() {
        let mut config = default_config(SectionKind::Hero);
        config.set("heading", json!("Say \"hi\" \\ <b>now</b>"));
        let result = compile_and_render(&generate(SectionKind::Hero, &config), &config);
        let node = result.node().expect("rendered");
        let h1 = node.find_tag("h1").expect("h1");
        assert_eq!(
            crate::Node::Element(h1.clone()).to_html(),
            "<h1 class=\"text-5xl md:text-7xl font-bold mb-6\" style=\"color: #ffffff\">Say &quot;hi&quot; \\ &lt;b&gt;now&lt;/b&gt;</h1>"
        );
    }

    #[test]
    fn garbage_in_number_slots_fails_to_compile() {
        let mut config = default_config(SectionKind::Hero);
        config.set("overlayOpacity", json!("lots"));
        let code = generate(SectionKind::Hero, &config);
        assert!(code.contains("\"opacity\": lots / 100.0"));
        let result = compile_and_render(&code, &config);
        assert_eq!(result.failure().map(|f| f.stage), Some(Stage::Compile));
    }

    #[test]
    fn collections_render_one_card_each() {
        let mut config = default_config(SectionKind::Collections);
        config.set(
            "collections",
            json!([
                {"id": "a", "name": "Alpha", "image": "a.png", "description": "first", "color": "#111"},
                {"id": "b", "name": "Beta", "image": "b.png", "description": "second", "color": "#222"}
            ]),
        );
        let result = compile_and_render(&generate(SectionKind::Collections, &config), &config);
        let node = result.node().expect("rendered");
        let text = node.text_content();
        assert!(text.contains("Alpha") && text.contains("Beta"));
        let card = node
            .find_element(&|el| el.attr("data-id") == Some("b"))
            .expect("card b");
        assert_eq!(card.class.as_deref(), Some("text-center group cursor-pointer"));
        assert!(node.find_element(&|el| el.tag == "img" && el.attr("src") == Some("a.png")).is_some());

        config.set("collections", json!([]));
        let result = compile_and_render(&generate(SectionKind::Collections, &config), &config);
        assert!(result.node().and_then(|n| n.find_tag("img")).is_none());
    }

    #[test]
    fn footer_only_links_configured_networks() {
        let config = default_config(SectionKind::Footer);
        let result = compile_and_render(&generate(SectionKind::Footer, &config), &config);
        let node = result.node().expect("rendered");
        assert_eq!(node.icon_names(), vec!["Facebook", "Instagram"]);
        assert!(node.text_content().contains("Privacy Policy"));

        let mut config = config;
        config.set(
            "socialMedia",
            json!({"facebook": "", "instagram": "", "twitter": "https://twitter.com/x"}),
        );
        let result = compile_and_render(&generate(SectionKind::Footer, &config), &config);
        assert_eq!(result.node().map(|n| n.icon_names().len()), Some(1));
    }

    #[test]
    fn generated_code_is_a_component_not_a_value() {
        let code = generate(SectionKind::Footer, &default_config(SectionKind::Footer));
        assert!(code.starts_with("// FooterSection\n|props|"));
        let scope = crate::Scope::standard(&SectionConfig::new()).expect("scope");
        assert!(!matches!(crate::compile(&code, &scope), Err(Error::NotAComponent { .. })));
    }
}
