use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use wirekit_kernel::dom::{Document, Event, EventType, Markup, NodeId};
use wirekit_kernel::{Kernel, KernelError};
use wirekit_templating::{COMPILE_HTML, TemplatingError, compile_html, offline};

fn demo_page(doc: &Document) -> NodeId {
    doc.mount(
        doc.root(),
        Markup::element("div")
            .attr("module", "testModule")
            .child(Markup::element("button").attr("class", "click-me").text("Click me"))
            .child(Markup::element("div").attr("id", "color-change"))
            .child(Markup::element("span").attr("k-click", "directiveTest").text("directive"))
            .child(
                Markup::element("section")
                    .attr("k-model", "personModel")
                    .attr("style", "visibility: hidden")
                    .child(Markup::element("h3").attr("title", "{{ name.last }}").text("{{ name.first }}"))
                    .child(Markup::element("em").text("age {{ age }}")),
            ),
    )
    .unwrap()
}

fn setup() -> (Kernel, NodeId, Arc<Mutex<Vec<&'static str>>>) {
    let kernel = Kernel::builder().build().unwrap();
    wirekit_templating::init(&kernel).unwrap();
    let root = demo_page(kernel.document());

    let calls = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&calls);
    kernel
        .register_module("testModule", move |scope| {
            let (on_click, on_directive) = (Arc::clone(&log), Arc::clone(&log));
            scope.set_events([("click .click-me", "clickHandler")])?;
            scope.handle("clickHandler", move |scope, _| {
                on_click.lock().push("clickHandler");
                let target = scope.find("#color-change")?[0];
                scope.document().set_attribute(target, "style", "background: #ABCDEF")?;
                Ok(())
            });
            scope.handle("directiveTest", move |_, _| {
                on_directive.lock().push("directiveTest");
                Ok(())
            });
            scope.set_data(
                "personModel",
                json!({ "name": { "first": "Wes", "last": "Cravens" }, "age": 24 }),
            );
            Ok(scope)
        })
        .unwrap();

    (kernel, root, calls)
}

#[test]
fn k_model_renders_scope_data_and_reveals_the_element() {
    let (kernel, root, _) = setup();
    kernel.init().unwrap();

    let doc = kernel.document();
    let section = doc.find(root, "section").unwrap()[0];
    assert_eq!(
        doc.outer_html(section).unwrap(),
        r#"<section k-model="personModel" style="visibility: visible"><h3 title="Cravens">Wes</h3><em>age 24</em></section>"#
    );
}

#[test]
fn k_click_and_events_table_both_fire() {
    let (kernel, root, calls) = setup();
    kernel.init().unwrap();
    let doc = kernel.document();

    let span = doc.find(root, "[k-click]").unwrap()[0];
    doc.trigger(span, "click").unwrap();
    let button = doc.find(root, ".click-me").unwrap()[0];
    doc.trigger(button, "click").unwrap();

    assert_eq!(*calls.lock(), ["directiveTest", "clickHandler"]);
    let swatch = doc.find(root, "#color-change").unwrap()[0];
    assert_eq!(doc.attribute(swatch, "style").as_deref(), Some("background: #ABCDEF"));
}

#[test]
fn root_is_wrapped_with_the_scope_id() {
    let (kernel, root, _) = setup();
    let scope = kernel.init().unwrap().remove(0);

    let wrapper = kernel.document().parent(root).unwrap();
    assert_eq!(kernel.document().attribute(wrapper, "data-module-id").as_deref(), Some(scope.id()));
}

#[test]
fn k_click_without_value_uses_the_selector_as_handler_name() {
    let kernel = Kernel::builder().build().unwrap();
    wirekit_templating::init(&kernel).unwrap();
    let doc = kernel.document();
    let root = doc
        .mount(
            doc.root(),
            Markup::element("div").attr("module", "m").child(Markup::element("b").attr("k-click", "")),
        )
        .unwrap();

    let hits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&hits);
    kernel
        .register_module("m", move |scope| {
            let counter = Arc::clone(&counter);
            scope.handle("b", move |_, _| {
                *counter.lock() += 1;
                Ok(())
            });
            Ok(scope)
        })
        .unwrap();

    let scope = kernel.init().unwrap().remove(0);
    assert_eq!(scope.events()[0].1, "b");
    doc.trigger(root, "click").unwrap();
    assert_eq!(*hits.lock(), 1);
}

#[test]
fn offline_copies_listeners_and_stays_detached() {
    let doc = Document::new();
    let list = doc
        .mount(doc.root(), Markup::element("ul").child(Markup::element("li").text("{{ x }}")))
        .unwrap();
    doc.on(list, EventType::new("click"), None, Arc::new(|_: &Event| {})).unwrap();

    let copy = offline(&doc, list, &json!(null)).unwrap();
    assert!(!doc.is_connected(copy));
    assert_eq!(doc.listener_count(copy), 1);
    assert_eq!(doc.outer_html(copy).unwrap(), doc.outer_html(list).unwrap());
}

#[test]
fn compile_html_swaps_the_rendered_copy_in() {
    let doc = Document::new();
    let holder = doc.mount(doc.root(), Markup::element("div")).unwrap();
    let card = doc
        .mount(holder, Markup::element("p").attr("data-x", "{{ id }}").child(Markup::element("a").attr("href", "/u/{{ id }}").text("{{ who }}")))
        .unwrap();

    let rendered = compile_html(&doc, card, &json!({ "id": 7, "who": "ann" })).unwrap();
    assert_ne!(rendered, card);
    assert!(!doc.is_connected(card));
    assert_eq!(doc.element_children(holder), [rendered]);
    assert_eq!(
        doc.inner_html(holder).unwrap(),
        r#"<p data-x="{{ id }}"><a href="/u/7">ann</a></p>"#
    );
}

#[test]
fn malformed_placeholders_surface_as_directive_errors() {
    let doc = Document::new();
    let p = doc.mount(doc.root(), Markup::element("p").text("{{ ?? }}")).unwrap();
    let err = compile_html(&doc, p, &json!({})).unwrap_err();
    assert!(matches!(err, KernelError::Directive { .. }));
    assert!(doc.is_connected(p));
}

#[test]
fn k_model_without_compile_html_fails() {
    let kernel = Kernel::builder().build().unwrap();
    kernel
        .register_directive(wirekit_templating::K_MODEL, wirekit_kernel::Directive::new(wirekit_templating::k_model))
        .unwrap();
    let doc = kernel.document();
    doc.mount(
        doc.root(),
        Markup::element("div").attr("module", "m").child(Markup::element("p").attr("k-model", "x")),
    )
    .unwrap();
    kernel.register_module("m", Ok).unwrap();

    let err = kernel.init().unwrap_err();
    assert!(matches!(err, KernelError::Registry { .. }), "{err}");
    assert!(!kernel.namespace("Middleware").unwrap().contains(COMPILE_HTML));
}

#[test]
fn init_twice_reports_duplicates() {
    let kernel = Kernel::builder().build().unwrap();
    wirekit_templating::init(&kernel).unwrap();
    assert!(matches!(wirekit_templating::init(&kernel), Err(TemplatingError::Kernel { .. })));
}
