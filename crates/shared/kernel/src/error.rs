use std::borrow::Cow;
use wirekit_dom::DomError;
use wirekit_registry::RegistryError;

/// A specialized [`KernelError`] enum of this crate.
#[wirekit_derive::wire_error]
pub enum KernelError {
    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[error("Document error{}: {source}", format_context(.context))]
    Dom { source: DomError, context: Option<Cow<'static, str>> },

    /// A required argument was empty or malformed.
    #[error("Invalid arguments{}: {message}", format_context(.context))]
    InvalidArguments { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A module factory returned something that is not a usable scope.
    #[error("Contract violation{}: {message}", format_context(.context))]
    ContractViolation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A selected element carries neither module attribute with a usable value.
    #[error("Missing module attribute{}: {message}", format_context(.context))]
    MissingModuleAttribute { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Reported by directive functions.
    #[error("Directive failed{}: {message}", format_context(.context))]
    Directive { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal kernel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
