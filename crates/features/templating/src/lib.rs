//! Templating feature: the `offline` and `compileHtml` middleware and the `k-click` and
//! `k-model` directives built on them.
//!
//! ```rust
//! use serde_json::json;
//! use wirekit_kernel::Kernel;
//! use wirekit_kernel::dom::Markup;
//!
//! let kernel = Kernel::builder().build().unwrap();
//! wirekit_templating::init(&kernel).unwrap();
//!
//! let doc = kernel.document();
//! let root = doc
//!     .mount(
//!         doc.root(),
//!         Markup::element("div")
//!             .attr("module", "person")
//!             .child(Markup::element("p").attr("k-model", "person").text("{{ name.first }}")),
//!     )
//!     .unwrap();
//! kernel
//!     .register_module("person", |scope| {
//!         scope.set_data("person", json!({ "name": { "first": "Wes" } }));
//!         Ok(scope)
//!     })
//!     .unwrap();
//!
//! kernel.init().unwrap();
//! assert_eq!(
//!     doc.inner_html(root).unwrap(),
//!     r#"<p k-model="person" style="visibility: visible">Wes</p>"#
//! );
//! ```

mod directives;
mod error;
mod interpolate;
mod middleware;

pub use crate::directives::{k_click, k_model};
pub use crate::error::{TemplatingError, TemplatingErrorExt};
pub use crate::interpolate::{has_placeholders, render};
pub use crate::middleware::{compile_html, offline};

use wirekit_kernel::{Directive, Kernel, Middleware};

pub const OFFLINE: &str = "offline";
pub const COMPILE_HTML: &str = "compileHtml";
pub const K_CLICK: &str = "k-click";
pub const K_MODEL: &str = "k-model";

/// Registers the middleware and directives of this feature on `kernel`.
///
/// # Errors
/// [`TemplatingError::Kernel`] when one of the names is already taken.
pub fn init(kernel: &Kernel) -> Result<(), TemplatingError> {
    kernel
        .register_middleware(OFFLINE, Middleware::new(offline))?
        .register_middleware(COMPILE_HTML, Middleware::new(compile_html))?
        .register_directive(K_CLICK, Directive::new(k_click))?
        .register_directive(K_MODEL, Directive::new(k_model))?;

    tracing::info!("Templating feature initialized");
    Ok(())
}
