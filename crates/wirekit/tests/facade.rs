use serde_json::json;
use wirekit::dom::Markup;
use wirekit::features;
use wirekit::kernel::module::{DIRECTIVE, MIDDLEWARE};

#[test]
fn enabled_features_match_the_build() {
    assert_eq!(features::is_enabled("templating"), cfg!(feature = "templating"));
    assert!(!features::is_enabled("nope"));
}

#[test]
fn init_registers_every_enabled_feature() {
    let kernel = wirekit::Kernel::builder().build().unwrap();
    let initialized = wirekit::init(&kernel).unwrap();
    assert_eq!(initialized, features::ENABLED);

    let registered = kernel.namespace(DIRECTIVE).unwrap().len() + kernel.namespace(MIDDLEWARE).unwrap().len();
    assert_eq!(registered > 0, cfg!(feature = "templating"));
    assert!(wirekit::init(&kernel).is_err() || !cfg!(feature = "templating"));
}

#[cfg(feature = "templating")]
#[test]
fn bootstraps_a_templated_module() {
    let kernel = wirekit::Kernel::builder().build().unwrap();
    wirekit::init(&kernel).unwrap();

    let doc = kernel.document();
    let root = doc
        .mount(
            doc.root(),
            Markup::element("div")
                .attr("data-module", "card")
                .child(Markup::element("span").attr("data-k-model", "card").text("{{ title }}")),
        )
        .unwrap();
    kernel
        .register_module("card", |scope| {
            scope.set_data("card", json!({ "title": "hello" }));
            Ok(scope)
        })
        .unwrap();

    kernel.init().unwrap();
    assert_eq!(doc.text_content(root), "hello");
}
