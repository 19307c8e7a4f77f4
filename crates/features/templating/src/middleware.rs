use crate::interpolate::{has_placeholders, render};
use serde_json::Value;
use tracing::debug;
use wirekit_kernel::KernelError;
use wirekit_kernel::dom::{Document, NodeId};

/// Detached deep copy of `element`, listeners included. The model is not used.
///
/// # Errors
/// [`KernelError::Dom`] for an unknown element.
pub fn offline(doc: &Document, element: NodeId, _model: &Value) -> Result<NodeId, KernelError> {
    Ok(doc.clone_node(element, true)?)
}

/// Renders `element` against `model` and swaps the rendered copy into its place.
///
/// Placeholders are substituted in the text nodes and attribute values below the
/// element; the copy is built offline and replaces the original in one step. Returns
/// the copy.
///
/// # Errors
/// [`KernelError::Dom`] when the element is detached, [`KernelError::Directive`] for a
/// malformed placeholder.
pub fn compile_html(doc: &Document, element: NodeId, model: &Value) -> Result<NodeId, KernelError> {
    let shadow = offline(doc, element, model)?;
    let rendered = render_subtree(doc, shadow, model)?;

    doc.replace_with(element, shadow)?;
    debug!(from = %element, to = %shadow, rendered, "Compiled element");
    Ok(shadow)
}

fn render_subtree(doc: &Document, root: NodeId, model: &Value) -> Result<usize, KernelError> {
    let mut rendered = 0;

    for node in doc.descendants(root) {
        if let Some(text) = doc.text(node) {
            if has_placeholders(&text) {
                doc.set_text(node, render(&text, model)?)?;
                rendered += 1;
            }
            continue;
        }

        for (name, value) in doc.attributes(node) {
            if has_placeholders(&value) {
                doc.set_attribute(node, name, render(&value, model)?)?;
                rendered += 1;
            }
        }
    }

    Ok(rendered)
}
