//! The wirekit kernel: module discovery, scopes, directive binding and bootstrap.
//! Built on `wirekit-dom` for the document and `wirekit-registry` for named storage.
//!
//! ## Bootstrap
//! ```rust
//! use wirekit_dom::{Markup, NodeId};
//! use wirekit_kernel::{Directive, Kernel};
//!
//! let kernel = Kernel::builder().build().unwrap();
//! let doc = kernel.document();
//! doc.mount(
//!     doc.root(),
//!     Markup::element("div")
//!         .attr("module", "counter")
//!         .child(Markup::element("button").attr("k-click", "increment")),
//! )
//! .unwrap();
//!
//! kernel
//!     .register_directive(
//!         "k-click",
//!         Directive::new(|scope, element, handler| {
//!             scope.listen_to("click", element, Some(handler)).map(|_| ())
//!         }),
//!     )
//!     .unwrap();
//! kernel
//!     .register_module("counter", |scope| {
//!         scope.handle("increment", |scope, _| {
//!             let next = scope.data("count").and_then(|v| v.as_u64()).unwrap_or(0) + 1;
//!             scope.set_data("count", next.into());
//!             Ok(())
//!         });
//!         Ok(scope)
//!     })
//!     .unwrap();
//!
//! let scope = kernel.init().unwrap().remove(0);
//! let button: NodeId = scope.find("button").unwrap()[0];
//! doc.trigger(button, "click").unwrap();
//! assert_eq!(scope.data("count"), Some(1.into()));
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use wirekit_kernel::config::{KernelConfig, load_config};
//! let cfg: KernelConfig = load_config(Some("wirekit.toml")).unwrap();
//! ```
pub mod config;
pub mod directive;
pub mod event_key;
pub mod mapper;
pub mod module;
pub mod scope;

mod error;
mod kernel;

pub use error::{KernelError, KernelErrorExt};
pub use event_key::EventKey;
pub use kernel::{Kernel, KernelBuilder};
pub use mapper::ModuleDescriptor;
pub use module::{Directive, Middleware, ModuleFactory};
pub use scope::{ListenTarget, ModuleScope};

pub use wirekit_dom as dom;
pub use wirekit_registry as registry;
