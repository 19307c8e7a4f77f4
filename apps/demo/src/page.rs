//! The test page and its module.

use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;
use wirekit::dom::{Document, DomError, Markup, NodeId};
use wirekit::{Kernel, KernelError};

pub const TEST_MODULE: &str = "testModule";

/// Mounts the test page under the document root and returns the module element.
///
/// # Errors
/// [`DomError`] when the document rejects the markup.
pub fn test_page(doc: &Document) -> Result<NodeId, DomError> {
    let page = Markup::element("div")
        .attr("module", TEST_MODULE)
        .child(Markup::element("h1").text("WireKit"))
        .child(Markup::element("button").attr("class", "click-me").text("Click me"))
        .child(Markup::element("div").attr("id", "color-change").attr("style", "height: 50px"))
        .child(Markup::element("p").attr("k-click", "directiveTest").text("Directive test"))
        .child(
            Markup::element("div")
                .attr("k-model", "personModel")
                .attr("style", "visibility: hidden")
                .child(Markup::element("span").attr("class", "name").text("{{ name.first }} {{ name.last }}"))
                .child(Markup::element("span").attr("class", "age").text("{{ age }}")),
        );

    doc.mount(doc.root(), page)
}

/// Registers `testModule`: a button that recolours a swatch, a `k-click` target and the
/// `personModel` data rendered by `k-model`.
///
/// # Errors
/// [`KernelError::Registry`] when the name is already registered.
pub fn register_test_module(kernel: &Kernel) -> Result<(), KernelError> {
    kernel.register_module(TEST_MODULE, |scope| {
        scope.on_init(|scope| {
            info!(scope = %scope.id(), "testModule loaded");
            Ok(())
        });

        scope.set_events([("click .click-me", "clickHandler")])?;

        let clicks = AtomicU32::new(0);
        scope.handle("clickHandler", move |scope, _| {
            info!("button was clicked");
            let color = swatch_color(clicks.fetch_add(1, Ordering::Relaxed));
            for swatch in scope.find("#color-change")? {
                scope.document().set_attribute(swatch, "style", format!("background: {color}"))?;
            }
            Ok(())
        });

        scope.handle("directiveTest", |_, event| {
            info!(target = %event.target, "directive test");
            Ok(())
        });

        scope.set_data(
            "personModel",
            json!({ "name": { "first": "Wes", "last": "Cravens" }, "age": 24 }),
        );

        Ok(scope)
    })?;
    Ok(())
}

fn swatch_color(seed: u32) -> String {
    format!("#{:06X}", fxhash::hash32(&seed) & 0x00FF_FFFF)
}
