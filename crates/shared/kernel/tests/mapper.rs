use wirekit_dom::{Document, Markup};
use wirekit_kernel::KernelError;
use wirekit_kernel::config::AttributeConfig;
use wirekit_kernel::mapper::{map_modules_to_elements, select_module_elements};

fn names(doc: &Document, attributes: &AttributeConfig) -> Vec<String> {
    let elements = select_module_elements(doc, attributes);
    map_modules_to_elements(doc, &elements, attributes)
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect()
}

#[test]
fn module_attribute_wins_over_data_module() {
    let doc = Document::new();
    doc.mount(
        doc.root(),
        Markup::element("main")
            .child(Markup::element("section").attr("data-module", "ignored"))
            .child(Markup::element("section").attr("module", "first"))
            .child(Markup::element("div").child(Markup::element("aside").attr("module", "second"))),
    )
    .unwrap();

    assert_eq!(names(&doc, &AttributeConfig::default()), ["first", "second"]);
}

#[test]
fn data_module_is_the_fallback_selection() {
    let doc = Document::new();
    doc.mount(doc.root(), Markup::element("section").attr("data-module", "fallback")).unwrap();
    assert_eq!(names(&doc, &AttributeConfig::default()), ["fallback"]);
}

#[test]
fn whitespace_separated_names_expand_to_several_descriptors() {
    let doc = Document::new();
    let a = doc.mount(doc.root(), Markup::element("div").attr("module", "  a \t b\nc ")).unwrap();
    let b = doc.mount(doc.root(), Markup::element("div").attr("module", "d")).unwrap();

    let attributes = AttributeConfig::default();
    let elements = select_module_elements(&doc, &attributes);
    let descriptors = map_modules_to_elements(&doc, &elements, &attributes).unwrap();

    let pairs: Vec<_> = descriptors.iter().map(|d| (d.name.as_str(), d.element)).collect();
    assert_eq!(pairs, [("a", a), ("b", a), ("c", a), ("d", b)]);
}

#[test]
fn blank_primary_attribute_falls_back_to_data_module_value() {
    let doc = Document::new();
    doc.mount(doc.root(), Markup::element("div").attr("module", " ").attr("data-module", "real"))
        .unwrap();
    assert_eq!(names(&doc, &AttributeConfig::default()), ["real"]);
}

#[test]
fn element_without_usable_value_is_an_error() {
    let doc = Document::new();
    let bare = doc.mount(doc.root(), Markup::element("div").attr("module", "")).unwrap();

    let err = map_modules_to_elements(&doc, &[bare], &AttributeConfig::default()).unwrap_err();
    assert!(matches!(err, KernelError::MissingModuleAttribute { .. }));
}

#[test]
fn detached_elements_are_not_selected() {
    let doc = Document::new();
    doc.mount(doc.root(), Markup::element("div")).unwrap();
    let _detached = doc.create_element("div");
    assert!(select_module_elements(&doc, &AttributeConfig::default()).is_empty());
}

#[test]
fn custom_attribute_names_are_honored() {
    let doc = Document::new();
    doc.mount(doc.root(), Markup::element("div").attr("x-widget", "gallery")).unwrap();
    let attributes = AttributeConfig {
        module: "x-widget".to_owned(),
        data_module: "data-x-widget".to_owned(),
        ..AttributeConfig::default()
    };
    assert_eq!(names(&doc, &attributes), ["gallery"]);
}
