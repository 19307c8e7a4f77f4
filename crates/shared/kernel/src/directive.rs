use crate::config::AttributeConfig;
use crate::error::{KernelError, KernelErrorExt};
use crate::module::Directive;
use crate::scope::ModuleScope;
use tracing::debug;
use wirekit_dom::{Document, NodeId};
use wirekit_registry::Registry;

/// Runs every registered directive against a scope, in registration order.
///
/// Directives are resolved from an anchor: the root's parent when it already carries the
/// module-id attribute, otherwise a `<div>` wrapped around the root and tagged with the
/// scope id. The first element below the anchor carrying `<name>` is used, falling back
/// to the first element below the root carrying `data-<name>`.
///
/// # Errors
/// Stops at the first failing directive and returns its error. Document errors (a root
/// that cannot be wrapped) surface as [`KernelError::Dom`].
pub fn bind_directives(
    scope: &ModuleScope,
    directives: &Registry,
    attributes: &AttributeConfig,
) -> Result<(), KernelError> {
    let doc = scope.document();

    for (name, value) in directives.entries() {
        let directive = value
            .downcast::<Directive>()
            .map_err(|_| KernelError::from(format!("'{name}' is registered as a directive but is not one")))
            .context("binding directives")?;

        let anchor = anchor(doc, scope, attributes)?;
        let Some((element, value)) = locate(doc, scope.root(), anchor, &name) else {
            continue;
        };

        debug!(scope = %scope.id(), directive = %name, element = %element, value = %value, "Binding directive");
        directive.call(scope, element, &value)?;
    }
    Ok(())
}

fn anchor(
    doc: &Document,
    scope: &ModuleScope,
    attributes: &AttributeConfig,
) -> Result<NodeId, KernelError> {
    if let Some(parent) = doc.parent(scope.root())
        && doc.has_attribute(parent, &attributes.module_id)
    {
        return Ok(parent);
    }

    let wrapper = doc.create_element("div");
    doc.set_attribute(wrapper, &attributes.module_id, scope.id())?;
    Ok(doc.wrap(scope.root(), wrapper)?)
}

fn locate(doc: &Document, root: NodeId, anchor: NodeId, name: &str) -> Option<(NodeId, String)> {
    let data_name = format!("data-{name}");
    let element = doc
        .descendants(anchor)
        .into_iter()
        .find(|node| doc.has_attribute(*node, name))
        .or_else(|| doc.descendants(root).into_iter().find(|node| doc.has_attribute(*node, &data_name)))?;

    let value = [name, data_name.as_str()]
        .into_iter()
        .filter_map(|attribute| doc.attribute(element, attribute))
        .find(|value| !value.is_empty())
        .unwrap_or_default();
    Some((element, value))
}
