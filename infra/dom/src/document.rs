use crate::error::DomError;
use crate::events::Binding;
use crate::markup::Markup;
use crate::node::{Node, NodeId, NodeKind};
use crate::selector::Selector;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug)]
pub(crate) struct DocumentInner {
    pub(crate) nodes: Vec<Node>,
    pub(crate) bindings: FxHashMap<NodeId, Vec<Binding>>,
}

impl DocumentInner {
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or_else(|| DomError::unknown_node(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.index()).ok_or_else(|| DomError::unknown_node(id.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node::new(kind));
        id
    }

    pub(crate) fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent?;
        self.get(parent)?.kind.is_element().then_some(parent)
    }

    /// 1-based position among the parent's element children.
    pub(crate) fn element_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        self.get(parent)?
            .children
            .iter()
            .filter(|child| self.get(**child).is_some_and(|n| n.kind.is_element()))
            .position(|child| *child == id)
            .map(|index| index + 1)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Pre-order walk below `id`, excluding `id`.
    pub(crate) fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> =
            self.get(id).map(|n| n.children.iter().rev().copied().collect()).unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.get(next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn detach(&mut self, id: NodeId) -> Result<Option<(NodeId, usize)>, DomError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings.iter().position(|child| *child == id);
        if let Some(index) = position {
            siblings.remove(index);
        }
        self.node_mut(id)?.parent = None;
        Ok(position.map(|index| (parent, index)))
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), DomError> {
        self.ensure_can_adopt(parent, child)?;
        self.detach(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn ensure_can_adopt(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if matches!(self.node(parent)?.kind, NodeKind::Text(_)) {
            return Err(DomError::hierarchy(format!("text node {parent} cannot have children")));
        }
        if matches!(self.node(child)?.kind, NodeKind::Document) {
            return Err(DomError::hierarchy("the document node cannot be moved"));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::hierarchy(format!("{child} is an ancestor of {parent}")));
        }
        Ok(())
    }

    fn drop_bindings(&mut self, id: NodeId) {
        let mut removed = usize::from(self.bindings.remove(&id).is_some());
        for node in self.descendants(id) {
            removed += usize::from(self.bindings.remove(&node).is_some());
        }
        if removed > 0 {
            trace!(node = %id, removed, "Dropped listeners of removed subtree");
        }
    }

    fn mount(&mut self, parent: NodeId, markup: Markup) -> Result<NodeId, DomError> {
        let id = match markup {
            Markup::Text(text) => self.push(NodeKind::Text(text)),
            Markup::Element { tag, attributes, children } => {
                let id = self.push(NodeKind::element(&tag));
                if let NodeKind::Element { attributes: slot, .. } = &mut self.node_mut(id)?.kind {
                    slot.extend(attributes);
                }
                for child in children {
                    self.mount(id, child)?;
                }
                id
            },
        };
        let end = self.node(parent)?.children.len();
        self.insert_at(parent, end, id)?;
        Ok(id)
    }

    fn clone_subtree(
        &mut self,
        source: NodeId,
        map: &mut Vec<(NodeId, NodeId)>,
    ) -> Result<NodeId, DomError> {
        let original = self.node(source)?;
        let kind = original.kind.clone();
        let children = original.children.clone();

        let copy = self.push(kind);
        map.push((source, copy));
        for child in children {
            let child_copy = self.clone_subtree(child, map)?;
            self.node_mut(child_copy)?.parent = Some(copy);
            self.node_mut(copy)?.children.push(child_copy);
        }
        Ok(copy)
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Document => {
                for child in &node.children {
                    self.write_html(*child, out);
                }
            },
            NodeKind::Text(text) => escape_into(text, false, out),
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            },
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Shared handle to an in-memory document.
///
/// Cloning is cheap; every clone observes the same tree. All operations run to completion
/// synchronously and never hold the internal lock while user callbacks run.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) inner: Arc<RwLock<DocumentInner>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the document node.
    #[must_use]
    pub fn new() -> Self {
        let inner = DocumentInner {
            nodes: vec![Node::new(NodeKind::Document)],
            bindings: FxHashMap::default(),
        };
        Self { inner: Arc::new(RwLock::new(inner)) }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether two handles point at the same document.
    #[must_use]
    pub fn same_document(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // --- Construction ---

    /// Creates a detached element; the tag name is lower-cased.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner.write().push(NodeKind::element(tag))
    }

    /// Creates a detached text node.
    #[must_use]
    pub fn create_text(&self, text: impl Into<String>) -> NodeId {
        self.inner.write().push(NodeKind::Text(text.into()))
    }

    /// Builds `markup` and appends it as the last child of `parent`.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] or [`DomError::Hierarchy`] if `parent` cannot hold children.
    pub fn mount(&self, parent: NodeId, markup: Markup) -> Result<NodeId, DomError> {
        let mut inner = self.inner.write();
        inner.node(parent)?;
        inner.mount(parent, markup)
    }

    // --- Tree mutation ---

    /// Moves `child` to the end of `parent`'s children.
    ///
    /// # Errors
    /// Returns [`DomError::Hierarchy`] when the move would create a cycle or the parent is text.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.write();
        let end = inner.node(parent)?.children.len();
        inner.insert_at(parent, end, child)
    }

    /// Inserts `wrapper` where `node` currently sits and moves `node` inside it.
    ///
    /// # Errors
    /// Returns [`DomError::Hierarchy`] if `node` is detached or `wrapper` cannot adopt it.
    pub fn wrap(&self, node: NodeId, wrapper: NodeId) -> Result<NodeId, DomError> {
        let mut inner = self.inner.write();
        inner.ensure_can_adopt(wrapper, node)?;
        let parent = inner
            .node(node)?
            .parent
            .ok_or_else(|| DomError::hierarchy(format!("cannot wrap detached node {node}")))?;
        let index = inner.node(parent)?.children.iter().position(|c| *c == node).unwrap_or(0);

        inner.insert_at(parent, index, wrapper)?;
        let end = inner.node(wrapper)?.children.len();
        inner.insert_at(wrapper, end, node)?;
        Ok(wrapper)
    }

    /// Detaches `node` from its parent and drops every listener bound inside the subtree.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] for foreign ids.
    pub fn remove(&self, node: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.write();
        if matches!(inner.node(node)?.kind, NodeKind::Document) {
            return Err(DomError::hierarchy("the document node cannot be removed"));
        }
        inner.detach(node)?;
        inner.drop_bindings(node);
        Ok(())
    }

    /// Puts `replacement` in `node`'s position; `node` is removed like [`Document::remove`].
    ///
    /// # Errors
    /// Returns [`DomError::Hierarchy`] if `node` is detached.
    pub fn replace_with(&self, node: NodeId, replacement: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.write();
        if node == replacement {
            return Ok(());
        }
        let parent = inner
            .node(node)?
            .parent
            .ok_or_else(|| DomError::hierarchy(format!("cannot replace detached node {node}")))?;
        let index = inner.node(parent)?.children.iter().position(|c| *c == node).unwrap_or(0);

        inner.detach(node)?;
        inner.insert_at(parent, index, replacement)?;
        inner.drop_bindings(node);
        Ok(())
    }

    /// Deep-copies `node` into a detached subtree, optionally copying its listeners.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] for foreign ids.
    pub fn clone_node(&self, node: NodeId, with_events: bool) -> Result<NodeId, DomError> {
        let mut inner = self.inner.write();
        let mut map = Vec::new();
        let copy = inner.clone_subtree(node, &mut map)?;

        if with_events {
            for (source, target) in map {
                if let Some(bindings) = inner.bindings.get(&source).cloned() {
                    inner.bindings.insert(target, bindings);
                }
            }
        }
        Ok(copy)
    }

    /// Replaces the children of an element with a single text node, or rewrites a text node.
    ///
    /// # Errors
    /// Returns [`DomError::Hierarchy`] for the document node.
    pub fn set_text(&self, node: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        let text = text.into();
        let mut inner = self.inner.write();
        match &mut inner.node_mut(node)?.kind {
            NodeKind::Text(current) => {
                *current = text;
                return Ok(());
            },
            NodeKind::Document => return Err(DomError::hierarchy("cannot set text on document")),
            NodeKind::Element { .. } => {},
        }

        for child in inner.node(node)?.children.clone() {
            inner.detach(child)?;
            inner.drop_bindings(child);
        }
        let text_node = inner.push(NodeKind::Text(text));
        inner.insert_at(node, 0, text_node)
    }

    // --- Attributes ---

    /// Reads a plain attribute.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.read().get(node)?.attribute(name).map(str::to_owned)
    }

    /// Reads the `data-<name>` attribute.
    #[must_use]
    pub fn data(&self, node: NodeId, name: &str) -> Option<String> {
        self.attribute(node, &format!("data-{name}"))
    }

    #[must_use]
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.inner.read().get(node).is_some_and(|n| n.attribute(name).is_some())
    }

    /// All attributes of an element in insertion order; empty for other nodes.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        match self.inner.read().get(node).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => {
                attributes.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            },
            _ => Vec::new(),
        }
    }

    /// Sets (or overwrites) an attribute on an element.
    ///
    /// # Errors
    /// Returns [`DomError::Hierarchy`] when `node` is not an element.
    pub fn set_attribute(
        &self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.write();
        match &mut inner.node_mut(node)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.into(), value.into());
                Ok(())
            },
            _ => Err(DomError::hierarchy(format!("{node} is not an element"))),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &mut self.inner.write().nodes.get_mut(node.index())?.kind {
            NodeKind::Element { attributes, .. } => attributes.shift_remove(name),
            _ => None,
        }
    }

    // --- Navigation ---

    /// Lower-case tag name of an element.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner.read().get(node)?.tag().map(str::to_owned)
    }

    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        self.inner.read().get(node).is_some_and(|n| n.kind.is_element())
    }

    /// Text payload of a text node.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<String> {
        match &self.inner.read().get(node)?.kind {
            NodeKind::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Concatenated text of the subtree.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let inner = self.inner.read();
        std::iter::once(node)
            .chain(inner.descendants(node))
            .filter_map(|id| match &inner.get(id)?.kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.read().get(node)?.parent
    }

    /// All child nodes, text included.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.read().get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        let inner = self.inner.read();
        inner
            .get(node)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|c| inner.get(*c).is_some_and(|child| child.kind.is_element()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 1-based position of an element among its parent's element children.
    #[must_use]
    pub fn element_index(&self, node: NodeId) -> Option<usize> {
        self.inner.read().element_index(node)
    }

    /// Every node below `node` in document order.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.read().descendants(node)
    }

    /// Whether `node` is reachable from the document node.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.inner.read().is_ancestor_or_self(NodeId::ROOT, node)
    }

    // --- Queries ---

    /// Whether `node` matches `selector`.
    #[must_use]
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(&self.inner.read(), node)
    }

    /// Elements below `scope` (excluding `scope`) matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
    pub fn find(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.find_parsed(scope, &selector))
    }

    #[must_use]
    pub fn find_parsed(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let inner = self.inner.read();
        inner.descendants(scope).into_iter().filter(|id| selector.matches(&inner, *id)).collect()
    }

    /// Document-wide [`Document::find`].
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.find(NodeId::ROOT, selector)
    }

    // --- Serialization ---

    /// Serializes the node including its own tag.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] for foreign ids.
    pub fn outer_html(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner.read();
        inner.node(node)?;
        let mut out = String::new();
        inner.write_html(node, &mut out);
        Ok(out)
    }

    /// Serializes the children of a node.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] for foreign ids.
    pub fn inner_html(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner.read();
        let mut out = String::new();
        for child in &inner.node(node)?.children {
            inner.write_html(*child, &mut out);
        }
        Ok(out)
    }
}
