use std::borrow::Cow;
use wirekit_kernel::KernelError;

/// Templating feature error type.
#[wirekit_derive::wire_error]
pub enum TemplatingError {
    #[error("Templating kernel error{}: {source}", format_context(.context))]
    Kernel { source: KernelError, context: Option<Cow<'static, str>> },

    /// A `{{ }}` placeholder without a property path.
    #[error("Template error{}: {message}", format_context(.context))]
    Template { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<TemplatingError> for KernelError {
    fn from(err: TemplatingError) -> Self {
        match err {
            TemplatingError::Kernel { source, .. } => source,
            TemplatingError::Template { .. } => {
                Self::Directive { message: err.to_string().into(), context: Some("compileHtml".into()) }
            },
        }
    }
}
