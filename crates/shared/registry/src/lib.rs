//! # Registry
//!
//! Typed key/value storage for the wirekit kernel.
//!
//! A [`Registry`] is an insertion-ordered map that may pin its value type and may forbid
//! redefinition. [`Namespaces`] is the table of named registries (`Module`, `Middleware`,
//! `Directive`, and anything an application adds) together with the global [`Options`].
//!
//! ```rust
//! use wirekit_registry::{Namespaces, RegistryError};
//!
//! let ns = Namespaces::new();
//! let routes = ns.create_untyped_namespace("Routes", Some(false)).unwrap();
//! routes.create("home", "/").unwrap();
//!
//! assert!(matches!(routes.modify("home", "/index"), Err(RegistryError::ModifyDenied { .. })));
//! assert!(matches!(ns.from("Nope"), Err(RegistryError::UnknownNamespace { .. })));
//! ```

mod error;
mod namespaces;
mod options;
mod registry;

pub use error::{RegistryError, RegistryErrorExt};
pub use namespaces::{Import, Importer, Namespaces};
pub use options::Options;
pub use registry::{Entries, ExpectedType, Registry, Value};
