#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the wirekit workspace.
//! Every crate in the workspace declares its error enum through [`macro@wire_error`] so that
//! errors share one shape: a human readable `message` (or an upstream `source`) plus an
//! optional `context` string attached while the error travels up the call chain.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! wirekit-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring a crate's error enum.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug` and `thiserror::Error` unless already derived.
/// * **Context**: a companion `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>`
///   and to `Result<T, Source>` for every variant wrapping an upstream error.
/// * **Conversions**: `From<Source>` for each variant with a `source` (or `#[source]`/`#[from]`)
///   field, so `?` lifts upstream errors.
/// * **Constructors**: a snake_case constructor per message-only variant, e.g.
///   `NotFound { message, context }` gains `fn not_found(message) -> Self`.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[wirekit_derive::wire_error]
/// pub enum RegistryError {
///     #[error("Entry not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn lookup() -> Result<(), RegistryError> {
///     Err(RegistryError::not_found("clickHandler")).context("Module namespace")
/// }
/// ```
#[proc_macro_attribute]
pub fn wire_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
