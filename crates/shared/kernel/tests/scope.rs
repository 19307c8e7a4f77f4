use parking_lot::Mutex;
use std::sync::Arc;
use wirekit_dom::{Markup, NodeId};
use wirekit_kernel::{EventKey, Kernel, KernelError, ListenTarget, ModuleScope};

struct Fixture {
    kernel: Kernel,
    root: NodeId,
    button: NodeId,
    calls: Arc<Mutex<Vec<String>>>,
}

fn fixture() -> Fixture {
    let kernel = Kernel::builder().build().unwrap();
    let doc = kernel.document();
    let root = doc
        .mount(
            doc.root(),
            Markup::element("section")
                .attr("module", "widget")
                .child(Markup::element("button").attr("class", "click-me").text("go"))
                .child(Markup::element("span").attr("id", "label")),
        )
        .unwrap();
    let button = doc.find(root, "button").unwrap()[0];
    Fixture { kernel, root, button, calls: Arc::new(Mutex::new(Vec::new())) }
}

fn recording(fx: &Fixture, scope: &ModuleScope, handler: &'static str) {
    let calls = Arc::clone(&fx.calls);
    scope.handle(handler, move |scope, _| {
        calls.lock().push(format!("{}:{handler}", scope.id()));
        Ok(())
    });
}

#[test]
fn scope_ids_are_sequential_per_kernel() {
    let fx = fixture();
    let a = fx.kernel.create_scope("widget", fx.root);
    let b = fx.kernel.create_scope("widget", fx.root);
    assert_eq!((a.id(), b.id()), ("module-1", "module-2"));
    assert_eq!(Kernel::builder().build().unwrap().create_scope("x", fx.root).id(), "module-1");
}

#[test]
fn listen_binds_delegated_and_direct_events() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    recording(&fx, &scope, "onAny");
    scope.set_events([("click .click-me", "onButton"), ("click", "onAny")]).unwrap();
    scope.listen().unwrap();

    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(*fx.calls.lock(), ["module-1:onButton", "module-1:onAny"]);

    fx.calls.lock().clear();
    let label = fx.kernel.document().find(fx.root, "#label").unwrap()[0];
    fx.kernel.document().trigger(label, "click").unwrap();
    assert_eq!(*fx.calls.lock(), ["module-1:onAny"]);
}

#[test]
fn listen_twice_does_not_double_bind() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    scope.set_events([("click .click-me", "onButton")]).unwrap();
    scope.listen().unwrap().listen().unwrap();

    assert_eq!(fx.kernel.document().listener_count(fx.root), 1);
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(fx.calls.lock().len(), 1);
}

#[test]
fn listen_to_with_callback_merges_into_events() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    scope.listen_to("click", ".click-me", Some("onButton")).unwrap();

    assert_eq!(scope.events(), [(EventKey::new("click", ".click-me"), "onButton".to_owned())]);
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(fx.calls.lock().len(), 1);
}

#[test]
fn listen_to_without_callback_binds_directly() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onAny");
    scope.listen_to("click", "onAny", None).unwrap();

    assert_eq!(scope.events(), [(EventKey::new("click", ""), "onAny".to_owned())]);
    fx.kernel.document().trigger(fx.root, "click").unwrap();
    assert_eq!(*fx.calls.lock(), ["module-1:onAny"]);
}

#[test]
fn listen_to_with_empty_callback_binds_directly() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onAny");
    assert!(!scope.has_handler("onButton"));
    assert!(scope.has_handler("onAny"));

    scope.listen_to("click", "onAny", Some("")).unwrap();

    assert_eq!(scope.events(), [(EventKey::new("click", ""), "onAny".to_owned())]);
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(*fx.calls.lock(), ["module-1:onAny"]);
}

#[test]
fn listen_to_with_a_bad_selector_leaves_the_table_alone() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    scope.listen_to("click", "button", Some("onButton")).unwrap();

    let err = scope.listen_to("click", "button[", Some("onButton")).unwrap_err();
    assert!(matches!(err, KernelError::Dom { .. }), "{err}");
    assert_eq!(scope.events(), [(EventKey::new("click", "button"), "onButton".to_owned())]);
    assert_eq!(fx.kernel.document().listener_count(fx.root), 1);

    scope.listen().unwrap();
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(fx.calls.lock().len(), 1);
}

#[test]
fn listen_to_converts_selections() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    scope.listen_to("click", vec![fx.button], Some("onButton")).unwrap();

    assert_eq!(scope.events()[0].0.selector(), "button");
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(fx.calls.lock().len(), 1);
}

#[test]
fn listen_to_rejects_missing_arguments() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    for (event, target) in [("", ListenTarget::from("h")), ("click", ListenTarget::from(""))] {
        let err = scope.listen_to(event, target, None).unwrap_err();
        assert!(matches!(err, KernelError::InvalidArguments { .. }));
    }
    let err = scope.listen_to("click", Vec::<NodeId>::new(), Some("h")).unwrap_err();
    assert!(matches!(err, KernelError::InvalidArguments { .. }));
}

#[test]
fn ignore_unbinds_without_editing_events() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    scope.set_events([("click .click-me", "onButton")]).unwrap();
    scope.listen().unwrap();

    scope.ignore("click .click-me").unwrap();
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert!(fx.calls.lock().is_empty());
    assert_eq!(scope.events().len(), 1);

    scope.listen().unwrap();
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(fx.calls.lock().len(), 1);
}

#[test]
fn ignore_without_selector_drops_every_binding_of_the_event() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    recording(&fx, &scope, "onAny");
    scope.set_events([("click .click-me", "onButton"), ("click", "onAny")]).unwrap();
    scope.listen().unwrap();

    scope.ignore("click").unwrap();
    assert_eq!(fx.kernel.document().listener_count(fx.root), 0);
}

#[test]
fn ignore_all_only_touches_its_own_namespace() {
    let fx = fixture();
    let first = fx.kernel.create_scope("widget", fx.root);
    let second = fx.kernel.create_scope("widget", fx.root);
    for scope in [&first, &second] {
        recording(&fx, scope, "onButton");
        scope.set_events([("click .click-me", "onButton")]).unwrap();
        scope.listen().unwrap();
    }

    first.ignore_all().unwrap();
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert_eq!(*fx.calls.lock(), ["module-2:onButton"]);
}

#[test]
fn ignore_all_drops_bindings_made_through_listen_to() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    recording(&fx, &scope, "onAny");
    scope.listen_to("click", ".click-me", Some("onButton")).unwrap();
    scope.listen_to("click", "onAny", None).unwrap();
    assert_eq!(fx.kernel.document().listener_count(fx.root), 2);

    scope.ignore_all().unwrap();
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    fx.kernel.document().trigger(fx.root, "click").unwrap();

    assert!(fx.calls.lock().is_empty());
    assert_eq!(fx.kernel.document().listener_count(fx.root), 0);
}

#[test]
fn ignore_all_on_empty_events_is_a_no_op() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    assert!(scope.ignore_all().is_ok());
}

#[test]
fn destroy_detaches_root_and_silences_handlers() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    recording(&fx, &scope, "onButton");
    scope.set_events([("click .click-me", "onButton")]).unwrap();
    scope.listen().unwrap();

    scope.destroy().unwrap();
    assert!(scope.is_destroyed());
    assert!(!fx.kernel.document().is_connected(fx.root));
    assert_eq!(fx.kernel.document().listener_count(fx.root), 0);

    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert!(fx.calls.lock().is_empty());
}

#[test]
fn missing_handlers_are_tolerated_at_dispatch() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    scope.set_events([("click", "nobodyHome")]).unwrap();
    scope.listen().unwrap();

    assert_eq!(fx.kernel.document().trigger(fx.button, "click").unwrap(), 1);
    let event = wirekit_dom::Event {
        kind: "click".to_owned(),
        target: fx.button,
        current_target: fx.root,
        delegate_target: fx.root,
    };
    assert!(matches!(scope.invoke("nobodyHome", &event), Err(KernelError::Registry { .. })));
}

#[test]
fn dropped_scopes_do_not_keep_handlers_alive() {
    let fx = fixture();
    {
        let scope = fx.kernel.create_scope("widget", fx.root);
        recording(&fx, &scope, "onAny");
        scope.set_events([("click", "onAny")]).unwrap();
        scope.listen().unwrap();
    }
    fx.kernel.document().trigger(fx.button, "click").unwrap();
    assert!(fx.calls.lock().is_empty());
}

#[test]
fn set_events_rejects_malformed_keys_and_keeps_the_table() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    scope.set_events([("click", "a")]).unwrap();

    assert!(scope.set_events([("input", "b"), (" bad", "c")]).is_err());
    assert_eq!(scope.events(), [(EventKey::new("click", ""), "a".to_owned())]);

    let err = scope.set_events([("input", "b"), ("click button[", "c")]).unwrap_err();
    assert!(matches!(err, KernelError::Dom { .. }), "{err}");
    assert_eq!(scope.events(), [(EventKey::new("click", ""), "a".to_owned())]);
    assert!(scope.listen().is_ok());
}

#[test]
fn data_bag_and_find_helpers() {
    let fx = fixture();
    let scope = fx.kernel.create_scope("widget", fx.root);
    scope.set_data("model", serde_json::json!({ "name": { "first": "Wes" } }));

    assert_eq!(scope.data("model").unwrap()["name"]["first"], "Wes");
    assert!(scope.data("missing").is_none());
    assert_eq!(scope.find(".click-me").unwrap(), [fx.button]);
    assert!(scope.find("li:hover").is_err());
}
