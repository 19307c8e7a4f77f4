//! The callables stored in the built-in namespaces.
//!
//! Each is a cheap, cloneable wrapper around an `Arc<dyn Fn>`, so registry lookups hand
//! out shared handles and no lock is held while one runs.

use crate::error::KernelError;
use crate::scope::ModuleScope;
use std::fmt;
use std::sync::Arc;
use wirekit_dom::{Document, NodeId};

/// Namespace holding [`ModuleFactory`] values.
pub const MODULE: &str = "Module";
/// Namespace holding [`Middleware`] values.
pub const MIDDLEWARE: &str = "Middleware";
/// Namespace holding [`Directive`] values.
pub const DIRECTIVE: &str = "Directive";

type FactoryFn = dyn Fn(ModuleScope) -> Result<ModuleScope, KernelError> + Send + Sync;
type MiddlewareFn =
    dyn Fn(&Document, NodeId, &serde_json::Value) -> Result<NodeId, KernelError> + Send + Sync;
type DirectiveFn = dyn Fn(&ModuleScope, NodeId, &str) -> Result<(), KernelError> + Send + Sync;

/// Configures a freshly created scope and hands it back.
///
/// Returning a scope that has already been destroyed breaks the module contract and
/// aborts bootstrap.
#[derive(Clone)]
pub struct ModuleFactory(Arc<FactoryFn>);

impl ModuleFactory {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(ModuleScope) -> Result<ModuleScope, KernelError> + Send + Sync + 'static,
    {
        Self(Arc::new(factory))
    }

    /// # Errors
    /// Whatever the factory reports.
    pub fn call(&self, scope: ModuleScope) -> Result<ModuleScope, KernelError> {
        (self.0)(scope)
    }
}

/// Element transformation shared between directives: takes an element and a JSON model,
/// returns the element that now stands in its place.
#[derive(Clone)]
pub struct Middleware(Arc<MiddlewareFn>);

impl Middleware {
    pub fn new<F>(middleware: F) -> Self
    where
        F: Fn(&Document, NodeId, &serde_json::Value) -> Result<NodeId, KernelError>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(middleware))
    }

    /// # Errors
    /// Whatever the middleware reports.
    pub fn call(
        &self,
        document: &Document,
        element: NodeId,
        model: &serde_json::Value,
    ) -> Result<NodeId, KernelError> {
        (self.0)(document, element, model)
    }
}

/// Declarative binding: called with the scope, the first element carrying the directive
/// attribute, and that attribute's value.
#[derive(Clone)]
pub struct Directive(Arc<DirectiveFn>);

impl Directive {
    pub fn new<F>(directive: F) -> Self
    where
        F: Fn(&ModuleScope, NodeId, &str) -> Result<(), KernelError> + Send + Sync + 'static,
    {
        Self(Arc::new(directive))
    }

    /// # Errors
    /// Whatever the directive reports.
    pub fn call(&self, scope: &ModuleScope, element: NodeId, value: &str) -> Result<(), KernelError> {
        (self.0)(scope, element, value)
    }
}

macro_rules! opaque_debug {
    ($($ty:ident),*) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($ty)).finish_non_exhaustive()
                }
            }
        )*
    };
}

opaque_debug!(ModuleFactory, Middleware, Directive);
