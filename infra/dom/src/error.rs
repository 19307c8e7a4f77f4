use std::borrow::Cow;

/// A specialized [`DomError`] enum of this crate.
#[wirekit_derive::wire_error]
pub enum DomError {
    /// The node id does not belong to this document.
    #[error("Unknown node{}: {message}", format_context(.context))]
    UnknownNode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The selector string is outside the supported grammar.
    #[error("Invalid selector{}: {message}", format_context(.context))]
    InvalidSelector { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The requested mutation would break the tree (cycles, detached parents, text parents).
    #[error("Hierarchy violation{}: {message}", format_context(.context))]
    Hierarchy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
