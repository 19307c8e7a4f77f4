//! Module scopes: the per-instance object a module factory configures.
//!
//! A scope owns an `events` table (`"<event> <selector>"` → handler name), the handlers
//! themselves, an optional `init` hook and a JSON data bag. [`ModuleScope::listen`] turns
//! the table into document bindings namespaced with the scope id, so several scopes can
//! share one root element without disturbing each other.

use crate::error::KernelError;
use crate::event_key::EventKey;
use crate::mapper::create_unique_selector;
use fxhash::FxHashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};
use wirekit_dom::{Document, Event, Listener, NodeId, Selector};
use wirekit_registry::{Namespaces, RegistryError};

type HandlerFn = dyn Fn(&ModuleScope, &Event) -> Result<(), KernelError> + Send + Sync;
type InitFn = dyn Fn(&ModuleScope) -> Result<(), KernelError> + Send + Sync;

/// What [`ModuleScope::listen_to`] binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenTarget {
    /// A selector string, or a handler name when no callback is given.
    Selector(String),
    /// A selection, converted with [`create_unique_selector`].
    Selection(Vec<NodeId>),
}

impl From<&str> for ListenTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<String> for ListenTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for ListenTarget {
    fn from(node: NodeId) -> Self {
        Self::Selection(vec![node])
    }
}

impl From<Vec<NodeId>> for ListenTarget {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Selection(nodes)
    }
}

impl From<&[NodeId]> for ListenTarget {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Selection(nodes.to_vec())
    }
}

#[derive(Default)]
struct ScopeState {
    events: IndexMap<EventKey, String>,
    handlers: FxHashMap<String, Arc<HandlerFn>>,
    init: Option<Arc<InitFn>>,
    data: FxHashMap<String, serde_json::Value>,
}

struct ScopeInner {
    id: String,
    name: String,
    root: NodeId,
    document: Document,
    namespaces: Namespaces,
    state: RwLock<ScopeState>,
    destroyed: AtomicBool,
}

/// Handle to one module instance. Clones share the instance.
///
/// Document listeners only hold the scope weakly: once every handle is dropped, pending
/// bindings become no-ops.
#[derive(Clone)]
pub struct ModuleScope {
    inner: Arc<ScopeInner>,
}

impl ModuleScope {
    pub(crate) fn new(
        id: String,
        name: String,
        root: NodeId,
        document: Document,
        namespaces: Namespaces,
    ) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                id,
                name,
                root,
                document,
                namespaces,
                state: RwLock::new(ScopeState::default()),
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    // --- Identity ---

    /// Unique per kernel, e.g. `module-3`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Module name the scope was created for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.inner.namespaces
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn same_scope(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Elements below the root matching `selector`.
    ///
    /// # Errors
    /// [`KernelError::Dom`] for selectors outside the supported grammar.
    pub fn find(&self, selector: &str) -> Result<Vec<NodeId>, KernelError> {
        Ok(self.inner.document.find(self.inner.root, selector)?)
    }

    // --- Configuration ---

    /// Registers (or replaces) the handler called `name`.
    pub fn handle<F>(&self, name: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&Self, &Event) -> Result<(), KernelError> + Send + Sync + 'static,
    {
        self.inner.state.write().handlers.insert(name.into(), Arc::new(handler));
        self
    }

    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.inner.state.read().handlers.contains_key(name)
    }

    /// Sets the hook run once by bootstrap, before [`ModuleScope::listen`].
    pub fn on_init<F>(&self, hook: F) -> &Self
    where
        F: Fn(&Self) -> Result<(), KernelError> + Send + Sync + 'static,
    {
        self.inner.state.write().init = Some(Arc::new(hook));
        self
    }

    /// Replaces the events table. Keys and their selectors are validated up front; on
    /// error the table is left untouched.
    ///
    /// # Errors
    /// [`KernelError::InvalidArguments`] for a malformed key, [`KernelError::Dom`] for an
    /// unparsable selector.
    pub fn set_events<K, C, I>(&self, events: I) -> Result<&Self, KernelError>
    where
        K: AsRef<str>,
        C: Into<String>,
        I: IntoIterator<Item = (K, C)>,
    {
        let table = events
            .into_iter()
            .map(|(key, callback)| {
                let key = EventKey::parse(key.as_ref())?;
                selector_of(&key)?;
                Ok((key, callback.into()))
            })
            .collect::<Result<IndexMap<_, _>, KernelError>>()?;
        self.inner.state.write().events = table;
        Ok(self)
    }

    /// Snapshot of the events table in insertion order.
    #[must_use]
    pub fn events(&self) -> Vec<(EventKey, String)> {
        self.inner.state.read().events.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn set_data(&self, name: impl Into<String>, value: serde_json::Value) -> &Self {
        self.inner.state.write().data.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn data(&self, name: &str) -> Option<serde_json::Value> {
        self.inner.state.read().data.get(name).cloned()
    }

    // --- Lifecycle ---

    /// Runs the `init` hook, if any.
    ///
    /// # Errors
    /// Whatever the hook reports.
    pub fn init(&self) -> Result<(), KernelError> {
        let hook = self.inner.state.read().init.clone();
        match hook {
            Some(hook) => hook(self),
            None => Ok(()),
        }
    }

    /// Calls the handler called `name`.
    ///
    /// # Errors
    /// [`KernelError::Registry`] when no such handler exists, otherwise whatever the
    /// handler reports.
    pub fn invoke(&self, name: &str, event: &Event) -> Result<(), KernelError> {
        let handler = self.inner.state.read().handlers.get(name).cloned().ok_or_else(|| {
            RegistryError::not_found(format!("'{name}' is not a handler of {}", self.inner.id))
        })?;
        handler(self, event)
    }

    /// Unbinds everything from the events table, then binds every entry again.
    ///
    /// # Errors
    /// [`KernelError::Dom`] when a selector cannot be parsed.
    pub fn listen(&self) -> Result<&Self, KernelError> {
        self.ignore_all()?;
        for (key, callback) in self.events() {
            self.bind(&key, &callback)?;
        }
        Ok(self)
    }

    /// Adds one entry to the events table and binds it right away.
    ///
    /// Without `callback` (or with an empty one), the target itself names the handler
    /// and the binding is direct on the root. Selections are turned into selector strings
    /// first.
    ///
    /// # Errors
    /// [`KernelError::InvalidArguments`] when `event` or `target` is empty,
    /// [`KernelError::Dom`] for an unparsable selector. The events table is only
    /// touched once the key is known to bind.
    pub fn listen_to(
        &self,
        event: &str,
        target: impl Into<ListenTarget>,
        callback: Option<&str>,
    ) -> Result<&Self, KernelError> {
        let target = match target.into() {
            ListenTarget::Selector(selector) => selector,
            ListenTarget::Selection(nodes) => create_unique_selector(&self.inner.document, &nodes),
        };
        if event.trim().is_empty() || target.trim().is_empty() {
            return Err(KernelError::invalid_arguments(
                "listen_to requires an event and a target: (<event>, <callback>) or (<event>, <selector>, <callback>)",
            ));
        }

        let (selector, callback) = match callback {
            Some(callback) if !callback.is_empty() => (target, callback.to_owned()),
            _ => (String::new(), target),
        };
        let key = EventKey::new(event.trim(), selector);
        selector_of(&key)?;

        self.inner.state.write().events.insert(key.clone(), callback.clone());
        self.bind(&key, &callback)?;
        Ok(self)
    }

    /// Unbinds the namespaced event behind `key`: every binding of it when the key has
    /// no selector, only the delegated binding with that selector otherwise. The events
    /// table is left as is.
    ///
    /// # Errors
    /// [`KernelError::InvalidArguments`] for a malformed key.
    pub fn ignore(&self, key: &str) -> Result<&Self, KernelError> {
        self.unbind(&EventKey::parse(key)?);
        Ok(self)
    }

    /// [`ModuleScope::ignore`] for every entry of the events table.
    ///
    /// # Errors
    /// Never fails for a table built through this type; kept fallible like `ignore`.
    pub fn ignore_all(&self) -> Result<&Self, KernelError> {
        for (key, _) in self.events() {
            self.unbind(&key);
        }
        Ok(self)
    }

    /// Removes the root from the document, unbinds the events table and marks the scope
    /// destroyed.
    ///
    /// # Errors
    /// [`KernelError::Dom`] when the root cannot be removed.
    pub fn destroy(&self) -> Result<&Self, KernelError> {
        self.inner.namespaces.log(format_args!("Destroyed module {}", self.inner.id));
        self.inner.document.remove(self.inner.root)?;
        self.ignore_all()?;
        self.inner.destroyed.store(true, Ordering::Release);
        debug!(scope = %self.inner.id, module = %self.inner.name, "Destroyed module scope");
        Ok(self)
    }

    fn bind(&self, key: &EventKey, callback: &str) -> Result<(), KernelError> {
        let event = key.namespaced(&self.inner.id);
        let selector = selector_of(key)?;

        let target = if key.has_selector() { key.selector() } else { self.inner.id.as_str() };
        self.inner.namespaces.log(format_args!("{event} events on {target} will trigger {callback}"));
        debug!(scope = %self.inner.id, event = %event, selector = key.selector(), callback, "Binding handler");

        let listener = handler_listener(Arc::downgrade(&self.inner), callback.to_owned());
        self.inner.document.on(self.inner.root, event, selector, listener)?;
        Ok(())
    }

    fn unbind(&self, key: &EventKey) {
        let event = key.namespaced(&self.inner.id);
        let target = if key.has_selector() { key.selector() } else { self.inner.id.as_str() };
        self.inner.namespaces.log(format_args!("Ignoring {event} events on {target}"));

        let selector = key.has_selector().then(|| key.selector());
        let removed = self.inner.document.off(self.inner.root, &event, selector);
        debug!(scope = %self.inner.id, event = %event, selector = key.selector(), removed, "Unbound handler");
    }
}

fn selector_of(key: &EventKey) -> Result<Option<Selector>, KernelError> {
    if key.has_selector() { Ok(Some(Selector::parse(key.selector())?)) } else { Ok(None) }
}

fn handler_listener(scope: Weak<ScopeInner>, callback: String) -> Listener {
    Arc::new(move |event: &Event| {
        let Some(inner) = scope.upgrade() else {
            return;
        };
        let scope = ModuleScope { inner };
        if let Err(err) = scope.invoke(&callback, event) {
            warn!(scope = %scope.id(), callback = %callback, event = %event.kind, "Handler failed: {err}");
        }
    })
}

impl fmt::Debug for ModuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("ModuleScope")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("root", &self.inner.root)
            .field("events", &state.events)
            .field("handlers", &state.handlers.keys().collect::<Vec<_>>())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
