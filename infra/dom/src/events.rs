//! Namespaced event binding and delegated dispatch.
//!
//! A binding lives on one node. Direct bindings fire when an event reaches that node while
//! bubbling; delegated bindings carry a [`Selector`] and fire once per element between the
//! event target and the bound node that matches it. Namespaces (`click.module-3`) exist so
//! that one owner can unbind its own listeners without touching anybody else's.

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;
use crate::selector::Selector;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Callback invoked for every matching dispatch.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Event name plus an optional namespace, written `name.namespace`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventType {
    name: String,
    namespace: Option<String>,
}

impl EventType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), namespace: None }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Splits at the first `.`; an empty name (`.ns`) matches every event name when unbinding.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((name, namespace)) if !namespace.is_empty() => {
                Self { name: name.to_owned(), namespace: Some(namespace.to_owned()) }
            },
            Some((name, _)) => Self::new(name),
            None => Self::new(raw),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether a bound type is covered by `self` used as an unbind filter.
    fn covers(&self, bound: &Self) -> bool {
        (self.name.is_empty() || self.name == bound.name)
            && self.namespace.as_ref().is_none_or(|ns| bound.namespace.as_ref() == Some(ns))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}.{namespace}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for EventType {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// What a listener sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Plain event name (`click`), without namespace.
    pub kind: String,
    /// Node the event was triggered on.
    pub target: NodeId,
    /// Node the listener is considered attached to: the matched element for delegated
    /// bindings, the bound node otherwise.
    pub current_target: NodeId,
    /// Node the binding actually lives on.
    pub delegate_target: NodeId,
}

#[derive(Clone)]
pub(crate) struct Binding {
    event: EventType,
    selector: Option<Selector>,
    listener: Listener,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("event", &self.event)
            .field("selector", &self.selector.as_ref().map(Selector::as_str))
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Binds `listener` on `node`, directly (`selector == None`) or delegated.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] for foreign ids.
    pub fn on(
        &self,
        node: NodeId,
        event: EventType,
        selector: Option<Selector>,
        listener: Listener,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.write();
        inner.node(node)?;
        trace!(
            node = %node,
            event = %event,
            selector = selector.as_ref().map(Selector::as_str),
            "Binding listener"
        );
        inner.bindings.entry(node).or_default().push(Binding { event, selector, listener });
        Ok(())
    }

    /// Removes bindings on `node` covered by `event`.
    ///
    /// Without a selector every binding of that type goes, delegated ones included; with a
    /// selector only delegated bindings whose selector text is identical. Returns the number
    /// of removed bindings.
    pub fn off(&self, node: NodeId, event: &EventType, selector: Option<&str>) -> usize {
        let mut inner = self.inner.write();
        let Some(bindings) = inner.bindings.get_mut(&node) else {
            return 0;
        };

        let before = bindings.len();
        let wanted = selector.map(str::trim);
        bindings.retain(|binding| {
            let selector_hit = match wanted {
                None => true,
                Some(text) => binding.selector.as_ref().is_some_and(|s| s.as_str() == text),
            };
            !(event.covers(&binding.event) && selector_hit)
        });
        let removed = before - bindings.len();
        if bindings.is_empty() {
            inner.bindings.remove(&node);
        }

        if removed > 0 {
            trace!(node = %node, event = %event, selector = wanted, removed, "Unbound listeners");
        }
        removed
    }

    /// Number of bindings currently attached to `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner.read().bindings.get(&node).map_or(0, Vec::len)
    }

    /// Dispatches `event_name` at `target`, bubbling up to the document node.
    ///
    /// At each node on the way up, delegated listeners run first (closest matching element
    /// first), then direct ones, each group in binding order. The listener set is captured
    /// before the first call, so listeners may bind and unbind freely. Returns how many
    /// listener calls were made.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] for foreign ids.
    pub fn trigger(&self, target: NodeId, event_name: &str) -> Result<usize, DomError> {
        let plan = {
            let inner = self.inner.read();
            inner.node(target)?;

            let mut path = vec![target];
            let mut current = inner.node(target)?.parent;
            while let Some(id) = current {
                path.push(id);
                current = inner.get(id).and_then(|n| n.parent);
            }

            let mut plan: Vec<(Listener, Event)> = Vec::new();
            for (depth, &host) in path.iter().enumerate() {
                let Some(bindings) = inner.bindings.get(&host) else {
                    continue;
                };
                let fires = |b: &&Binding| b.event.name == event_name;

                for &element in &path[..depth] {
                    for binding in bindings.iter().filter(fires) {
                        if binding.selector.as_ref().is_some_and(|s| s.matches(&inner, element)) {
                            plan.push((
                                Arc::clone(&binding.listener),
                                Event {
                                    kind: event_name.to_owned(),
                                    target,
                                    current_target: element,
                                    delegate_target: host,
                                },
                            ));
                        }
                    }
                }

                for binding in bindings.iter().filter(fires).filter(|b| b.selector.is_none()) {
                    plan.push((
                        Arc::clone(&binding.listener),
                        Event {
                            kind: event_name.to_owned(),
                            target,
                            current_target: host,
                            delegate_target: host,
                        },
                    ));
                }
            }
            plan
        };

        trace!(target = %target, event = event_name, calls = plan.len(), "Dispatching event");
        for (listener, event) in &plan {
            listener(event);
        }
        Ok(plan.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_namespace() {
        let event = EventType::parse("click.module-1");
        assert_eq!(event.name(), "click");
        assert_eq!(event.namespace(), Some("module-1"));
        assert_eq!(event.to_string(), "click.module-1");
        assert_eq!(EventType::parse("input").namespace(), None);
    }

    #[test]
    fn namespace_filter_only_covers_its_own_bindings() {
        let mine = EventType::parse("click.module-1");
        assert!(mine.covers(&EventType::parse("click.module-1")));
        assert!(!mine.covers(&EventType::parse("click.module-2")));
        assert!(!mine.covers(&EventType::parse("click")));
        assert!(EventType::new("click").covers(&EventType::parse("click.module-2")));
        assert!(EventType::parse(".module-1").covers(&EventType::parse("input.module-1")));
    }
}
