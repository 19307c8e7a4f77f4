use serde::{Deserialize, Serialize};

/// Runtime switches shared by every namespace.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Gates [`Namespaces::log`](crate::Namespaces::log).
    pub log_enabled: bool,
}
