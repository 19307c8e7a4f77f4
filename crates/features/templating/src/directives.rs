use crate::COMPILE_HTML;
use serde_json::Value;
use tracing::debug;
use wirekit_kernel::dom::{Document, NodeId};
use wirekit_kernel::module::MIDDLEWARE;
use wirekit_kernel::{KernelError, KernelErrorExt, Middleware, ModuleScope};

/// `k-click="handler"`: clicks on the element call the scope's `handler`.
///
/// # Errors
/// Whatever [`ModuleScope::listen_to`] reports.
pub fn k_click(scope: &ModuleScope, element: NodeId, handler: &str) -> Result<(), KernelError> {
    scope.listen_to("click", element, Some(handler))?;
    Ok(())
}

/// `k-model="name"`: renders the element against the scope's `name` data through the
/// `compileHtml` middleware, then makes it visible.
///
/// # Errors
/// [`KernelError::Registry`] when `compileHtml` is not registered, otherwise whatever the
/// middleware reports.
pub fn k_model(scope: &ModuleScope, element: NodeId, name: &str) -> Result<(), KernelError> {
    let model = scope.data(name).unwrap_or(Value::Null);
    let compile = scope
        .namespaces()
        .from(MIDDLEWARE)
        .and_then(|middleware| middleware.import_as::<Middleware>(COMPILE_HTML))
        .context("k-model")?;

    let doc = scope.document();
    let rendered = compile.call(doc, element, &model)?;
    show(doc, rendered)?;
    debug!(scope = %scope.id(), model = name, element = %rendered, "Bound model");
    Ok(())
}

fn show(doc: &Document, element: NodeId) -> Result<(), KernelError> {
    let style = doc.attribute(element, "style").unwrap_or_default();
    let mut declarations: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty() && !d.split(':').next().is_some_and(|p| p.trim() == "visibility"))
        .map(str::to_owned)
        .collect();
    declarations.push("visibility: visible".to_owned());

    doc.set_attribute(element, "style", declarations.join("; "))?;
    Ok(())
}
