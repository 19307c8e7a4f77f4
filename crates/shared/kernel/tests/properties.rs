use proptest::prelude::*;
use wirekit_dom::{Document, Markup};
use wirekit_kernel::EventKey;
use wirekit_kernel::mapper::create_unique_selector;

proptest! {
    #[test]
    fn event_keys_split_event_from_selector(
        event in "[a-z:]{1,10}",
        gap in "[ \t]{1,3}",
        selector in "([.#]?[a-z][a-z0-9-]{0,6}( |>)?){0,3}",
    ) {
        let key = EventKey::parse(&format!("{event}{gap}{selector}")).unwrap();
        prop_assert_eq!(key.event(), event.as_str());
        prop_assert_eq!(key.selector(), selector.as_str());
    }

    #[test]
    fn unique_selector_finds_exactly_the_item(len in 1_usize..12, pick in 0_usize..12) {
        let pick = pick % len;
        let doc = Document::new();
        let list = doc
            .mount(doc.root(), Markup::element("ul").children((0..len).map(|_| Markup::element("li"))))
            .unwrap();
        let item = doc.element_children(list)[pick];

        let selector = create_unique_selector(&doc, &[item, list]);
        let found = doc.query_all(&selector).unwrap();
        if pick == 0 {
            // `ul>li` without an index matches every item; the first is still the first match.
            prop_assert_eq!(found.first().copied(), Some(item));
        } else {
            prop_assert_eq!(found, vec![item]);
        }
    }
}
