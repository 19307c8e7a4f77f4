use proptest::prelude::*;
use serde_json::json;
use wirekit_templating::{has_placeholders, render};

proptest! {
    #[test]
    fn text_without_braces_is_unchanged(text in "[^{}]*") {
        prop_assert!(!has_placeholders(&text));
        prop_assert_eq!(render(&text, &json!({ "a": 1 })).unwrap(), text);
    }

    #[test]
    fn string_values_are_inserted_verbatim(value in "[^{}]*", prefix in "[a-z ]{0,8}") {
        let model = json!({ "field": { "inner": value.clone() } });
        let out = render(&format!("{prefix}{{{{ field.inner }}}}"), &model).unwrap();
        prop_assert_eq!(out, format!("{prefix}{value}"));
    }

    #[test]
    fn integers_render_as_json_text(n in any::<i64>()) {
        prop_assert_eq!(render("{{n}}", &json!({ "n": n })).unwrap(), n.to_string());
    }
}
