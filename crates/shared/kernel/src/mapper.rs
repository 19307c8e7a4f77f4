//! Finding module elements and turning selections back into selector strings.

use crate::config::AttributeConfig;
use crate::error::KernelError;
use tracing::debug;
use wirekit_dom::{Document, NodeId};

/// One module name bound to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub element: NodeId,
}

/// Every connected element carrying the primary module attribute, in document order.
/// When there are none, every element carrying the fallback attribute instead.
#[must_use]
pub fn select_module_elements(doc: &Document, attributes: &AttributeConfig) -> Vec<NodeId> {
    let with = |attribute: &str| -> Vec<NodeId> {
        doc.descendants(doc.root())
            .into_iter()
            .filter(|node| doc.has_attribute(*node, attribute))
            .collect()
    };

    let primary = with(&attributes.module);
    if primary.is_empty() { with(&attributes.data_module) } else { primary }
}

/// Expands elements into one descriptor per module name, flattened in element order.
///
/// The name list comes from the first attribute, in lookup order, with a non-blank value;
/// names are separated by runs of whitespace.
///
/// # Errors
/// [`KernelError::MissingModuleAttribute`] for an element where no lookup yields a name.
pub fn map_modules_to_elements(
    doc: &Document,
    elements: &[NodeId],
    attributes: &AttributeConfig,
) -> Result<Vec<ModuleDescriptor>, KernelError> {
    let lookups = [attributes.module.as_str(), attributes.data_module.as_str()];
    let mut descriptors = Vec::with_capacity(elements.len());

    for &element in elements {
        let names = lookups
            .iter()
            .filter_map(|attribute| doc.attribute(element, attribute))
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                KernelError::missing_module_attribute(format!(
                    "element {element} has no '{}' or '{}' value",
                    attributes.module, attributes.data_module
                ))
            })?;

        descriptors.extend(
            names.split_whitespace().map(|name| ModuleDescriptor { name: name.to_owned(), element }),
        );
    }

    debug!(elements = elements.len(), modules = descriptors.len(), "Mapped module elements");
    Ok(descriptors)
}

/// Builds a `>`-joined selector from a selection, deepest node first.
///
/// Each element contributes its lower-cased tag; when its parent has more than one child
/// with that tag, the 1-based position among all element children is appended as
/// `:nth-child(i)` unless it is the first. Segments are prepended, so `[li, ul]` gives
/// `ul>li:nth-child(2)` for the second item of a list. Non-elements are skipped.
#[must_use]
pub fn create_unique_selector(doc: &Document, nodes: &[NodeId]) -> String {
    let mut path = String::new();

    for &node in nodes {
        let Some(tag) = doc.tag_name(node) else {
            continue;
        };
        let mut segment = tag.to_ascii_lowercase();

        if let Some(parent) = doc.parent(node) {
            let siblings = doc.element_children(parent);
            let same_tag = siblings
                .iter()
                .filter(|sibling| doc.tag_name(**sibling).is_some_and(|t| t == segment))
                .count();
            if same_tag > 1
                && let Some(index) = doc.element_index(node).filter(|i| *i > 1)
            {
                segment.push_str(&format!(":nth-child({index})"));
            }
        }

        path = if path.is_empty() { segment } else { format!("{segment}>{path}") };
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirekit_dom::Markup;

    fn list(doc: &Document) -> NodeId {
        doc.mount(
            doc.root(),
            Markup::element("ul")
                .child(Markup::element("li").text("a"))
                .child(Markup::element("LI").text("b"))
                .child(Markup::element("span")),
        )
        .unwrap()
    }

    #[test]
    fn first_of_several_siblings_has_no_index() {
        let doc = Document::new();
        let ul = list(&doc);
        let first = doc.element_children(ul)[0];
        assert_eq!(create_unique_selector(&doc, &[first]), "li");
    }

    #[test]
    fn later_siblings_are_indexed_and_ancestors_prepended() {
        let doc = Document::new();
        let ul = list(&doc);
        let second = doc.element_children(ul)[1];
        assert_eq!(create_unique_selector(&doc, &[second, ul]), "ul>li:nth-child(2)");
    }

    #[test]
    fn unique_tags_are_never_indexed() {
        let doc = Document::new();
        let ul = list(&doc);
        let span = doc.element_children(ul)[2];
        assert_eq!(create_unique_selector(&doc, &[span]), "span");
    }

    #[test]
    fn text_nodes_are_skipped() {
        let doc = Document::new();
        let ul = list(&doc);
        let text = doc.children(doc.element_children(ul)[0])[0];
        assert_eq!(create_unique_selector(&doc, &[text, ul]), "ul");
        assert_eq!(create_unique_selector(&doc, &[]), "");
    }
}
