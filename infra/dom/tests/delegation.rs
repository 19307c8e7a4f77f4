use parking_lot::Mutex;
use std::sync::Arc;
use wirekit_dom::{Document, Event, EventType, Listener, Markup, NodeId, Selector};

fn recorder() -> (Arc<Mutex<Vec<Event>>>, Listener) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, Arc::new(move |event: &Event| sink.lock().push(event.clone())))
}

fn fixture() -> (Document, NodeId, NodeId, NodeId) {
    let doc = Document::new();
    let section = doc
        .mount(
            doc.root(),
            Markup::element("section").child(
                Markup::element("ul")
                    .child(Markup::element("li").attr("class", "item").text("a"))
                    .child(Markup::element("li").attr("class", "item").text("b")),
            ),
        )
        .unwrap();
    let items = doc.find(section, "li").unwrap();
    (doc, section, items[0], items[1])
}

#[test]
fn direct_binding_fires_on_bubbling() {
    let (doc, section, first, _) = fixture();
    let (seen, listener) = recorder();
    doc.on(section, EventType::parse("click.one"), None, listener).unwrap();

    assert_eq!(doc.trigger(first, "click").unwrap(), 1);
    let events = seen.lock();
    assert_eq!(events[0].target, first);
    assert_eq!(events[0].current_target, section);
}

#[test]
fn delegated_binding_only_fires_for_matching_elements() {
    let (doc, section, first, second) = fixture();
    let (seen, listener) = recorder();
    let selector = Selector::parse("ul>li:nth-child(2)").unwrap();
    doc.on(section, EventType::parse("click.one"), Some(selector), listener).unwrap();

    assert_eq!(doc.trigger(first, "click").unwrap(), 0);
    assert_eq!(doc.trigger(second, "click").unwrap(), 1);
    assert_eq!(seen.lock()[0].current_target, second);
    assert_eq!(seen.lock()[0].delegate_target, section);
}

#[test]
fn delegated_listeners_run_before_direct_ones() {
    let (doc, section, first, _) = fixture();
    let order = Arc::new(Mutex::new(Vec::new()));

    let direct = Arc::clone(&order);
    doc.on(section, EventType::new("click"), None, Arc::new(move |_| direct.lock().push("direct")))
        .unwrap();
    let delegated = Arc::clone(&order);
    doc.on(
        section,
        EventType::new("click"),
        Some(Selector::parse(".item").unwrap()),
        Arc::new(move |_| delegated.lock().push("delegated")),
    )
    .unwrap();

    doc.trigger(first, "click").unwrap();
    assert_eq!(*order.lock(), vec!["delegated", "direct"]);
}

#[test]
fn off_respects_namespaces() {
    let (doc, section, first, _) = fixture();
    let (seen, listener) = recorder();
    doc.on(section, EventType::parse("click.one"), None, Arc::clone(&listener)).unwrap();
    doc.on(section, EventType::parse("click.two"), None, listener).unwrap();

    assert_eq!(doc.off(section, &EventType::parse("click.one"), None), 1);
    doc.trigger(first, "click").unwrap();
    assert_eq!(seen.lock().len(), 1);
    assert_eq!(doc.listener_count(section), 1);
}

#[test]
fn off_with_selector_keeps_direct_bindings() {
    let (doc, section, first, _) = fixture();
    let (seen, listener) = recorder();
    let ns = EventType::parse("click.one");
    doc.on(section, ns.clone(), None, Arc::clone(&listener)).unwrap();
    doc.on(section, ns.clone(), Some(Selector::parse(".item").unwrap()), listener).unwrap();

    assert_eq!(doc.off(section, &ns, Some(".item")), 1);
    assert_eq!(doc.trigger(first, "click").unwrap(), 1);
    assert_eq!(seen.lock()[0].current_target, section);
}

#[test]
fn listeners_may_unbind_during_dispatch() {
    let (doc, section, first, _) = fixture();
    let calls = Arc::new(Mutex::new(0));
    let handle = doc.clone();
    let counter = Arc::clone(&calls);
    doc.on(
        section,
        EventType::parse("click.once"),
        None,
        Arc::new(move |event: &Event| {
            *counter.lock() += 1;
            handle.off(event.delegate_target, &EventType::parse("click.once"), None);
        }),
    )
    .unwrap();

    doc.trigger(first, "click").unwrap();
    doc.trigger(first, "click").unwrap();
    assert_eq!(*calls.lock(), 1);
}

#[test]
fn removing_a_subtree_drops_its_listeners() {
    let (doc, section, first, _) = fixture();
    let (seen, listener) = recorder();
    doc.on(first, EventType::new("click"), None, listener).unwrap();

    doc.remove(section).unwrap();
    assert_eq!(doc.listener_count(first), 0);
    doc.trigger(first, "click").unwrap();
    assert!(seen.lock().is_empty());
}

#[test]
fn clone_with_events_copies_listeners() {
    let (doc, section, _, _) = fixture();
    let (seen, listener) = recorder();
    doc.on(section, EventType::new("click"), Some(Selector::parse("li").unwrap()), listener)
        .unwrap();

    let copy = doc.clone_node(section, true).unwrap();
    doc.replace_with(section, copy).unwrap();
    let li = doc.find(copy, "li").unwrap()[0];
    assert_eq!(doc.trigger(li, "click").unwrap(), 1);
    assert_eq!(seen.lock()[0].delegate_target, copy);
}
