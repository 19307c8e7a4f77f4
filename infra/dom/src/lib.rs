//! # DOM
//!
//! An arena-backed, in-memory document: the presentation layer the wirekit kernel binds
//! modules and directives against. It covers exactly what the kernel needs from a DOM
//! library and nothing more.
//!
//! # Core Features
//!
//! - **Arena tree**: nodes are addressed by compact [`NodeId`]s; removal detaches, ids stay valid.
//! - **Selectors**: a CSS subset ([`Selector`]) for attribute lookups and delegation filters.
//! - **Namespaced delegation**: [`Document::on`] / [`Document::off`] / [`Document::trigger`]
//!   with `event.namespace` types, delegated (selector) and direct bindings.
//! - **Markup builder**: [`Markup`] assembles subtrees without an HTML parser.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wirekit_dom::{Document, EventType, Markup, Selector};
//!
//! # fn main() -> Result<(), wirekit_dom::DomError> {
//! let doc = Document::new();
//! let panel = doc.mount(
//!     doc.root(),
//!     Markup::element("div").child(Markup::element("button").attr("class", "go")),
//! )?;
//!
//! let clicks = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&clicks);
//! doc.on(
//!     panel,
//!     EventType::parse("click.demo"),
//!     Some(Selector::parse(".go")?),
//!     Arc::new(move |_| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }),
//! )?;
//!
//! let button = doc.find(panel, "button")?[0];
//! doc.trigger(button, "click")?;
//! assert_eq!(clicks.load(Ordering::SeqCst), 1);
//!
//! doc.off(panel, &EventType::parse("click.demo"), None);
//! doc.trigger(button, "click")?;
//! assert_eq!(clicks.load(Ordering::SeqCst), 1);
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod events;
mod markup;
mod node;
mod selector;

pub use document::Document;
pub use error::{DomError, DomErrorExt};
pub use events::{Event, EventType, Listener};
pub use markup::Markup;
pub use node::{NodeId, NodeKind};
pub use selector::Selector;
