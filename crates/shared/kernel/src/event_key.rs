//! Keys of a scope's `events` table: `"<event> <selector>"`.

use crate::error::KernelError;
use std::fmt;
use std::str::FromStr;
use wirekit_dom::EventType;

/// A parsed events-table key.
///
/// The event name is the leading run of non-whitespace characters; everything after the
/// whitespace that follows it is the selector, possibly empty.
///
/// ```rust
/// use wirekit_kernel::EventKey;
///
/// let key = EventKey::parse("click .click-me").unwrap();
/// assert_eq!(key.event(), "click");
/// assert_eq!(key.selector(), ".click-me");
/// assert_eq!(key.namespaced("module-1").to_string(), "click.module-1");
///
/// let bare = EventKey::parse("submit").unwrap();
/// assert!(!bare.has_selector());
/// assert_eq!(bare.to_string(), "submit ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    event: String,
    selector: String,
}

impl EventKey {
    #[must_use]
    pub fn new(event: impl Into<String>, selector: impl Into<String>) -> Self {
        Self { event: event.into(), selector: selector.into() }
    }

    /// # Errors
    /// [`KernelError::InvalidArguments`] when `raw` is empty, starts with whitespace, or
    /// spans several lines.
    pub fn parse(raw: &str) -> Result<Self, KernelError> {
        if raw.is_empty() || raw.starts_with(char::is_whitespace) || raw.contains('\n') {
            return Err(KernelError::invalid_arguments(format!(
                "'{raw}' is not an event key, expected '<event> [selector]'"
            )));
        }

        let (event, rest) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
        Ok(Self::new(event, rest.trim_start()))
    }

    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    #[must_use]
    pub fn has_selector(&self) -> bool {
        !self.selector.is_empty()
    }

    /// The event type bound on the document: `<event>.<scope_id>`.
    #[must_use]
    pub fn namespaced(&self, scope_id: &str) -> EventType {
        EventType::new(self.event.as_str()).with_namespace(scope_id)
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.event, self.selector)
    }
}

impl FromStr for EventKey {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
