use std::borrow::Cow;

/// A specialized [`RegistryError`] enum of this crate.
#[wirekit_derive::wire_error]
pub enum RegistryError {
    /// The registry declares a value type and the stored value is of another one.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Duplicate key{}: {message}", format_context(.context))]
    DuplicateKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown namespace{}: {message}", format_context(.context))]
    UnknownNamespace { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// `modify` was called on a registry created without overwrite permission.
    #[error("Modification denied{}: {message}", format_context(.context))]
    ModifyDenied { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
