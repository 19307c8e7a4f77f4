/// Declarative description of a subtree, mounted with [`Document::mount`](crate::Document::mount).
///
/// ```rust
/// use wirekit_dom::{Document, Markup};
///
/// let doc = Document::new();
/// let list = doc
///     .mount(
///         doc.root(),
///         Markup::element("ul")
///             .child(Markup::element("li").text("one"))
///             .child(Markup::element("li").text("two")),
///     )
///     .unwrap();
/// assert_eq!(doc.outer_html(list).unwrap(), "<ul><li>one</li><li>two</li></ul>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element { tag: String, attributes: Vec<(String, String)>, children: Vec<Self> },
    Text(String),
}

impl Markup {
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element { tag: tag.into(), attributes: Vec::new(), children: Vec::new() }
    }

    #[must_use]
    pub fn text_node(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Sets an attribute; ignored on text nodes.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            attributes.push((name.into(), value.into()));
        }
        self
    }

    /// Appends a child; ignored on text nodes.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    #[must_use]
    pub fn children(self, children: impl IntoIterator<Item = Self>) -> Self {
        children.into_iter().fold(self, Self::child)
    }

    /// Appends a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Self::Text(text.into()))
    }
}
