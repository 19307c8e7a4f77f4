use serde::{Deserialize, Serialize};
use wirekit_registry::Options;

/// Kernel configuration. Every field has a default, so an empty source is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub options: Options,
    /// Prefix of generated scope ids (`module-1`, `module-2`, ...).
    pub id_prefix: String,
    pub attributes: AttributeConfig,
}

/// Attribute names the kernel reads and writes on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    /// Primary module marker, looked up first.
    pub module: String,
    /// Fallback module marker.
    pub data_module: String,
    /// Written on the wrapper directives are resolved from.
    pub module_id: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            options: Options::default(),
            id_prefix: "module-".to_owned(),
            attributes: AttributeConfig::default(),
        }
    }
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            module: "module".to_owned(),
            data_module: "data-module".to_owned(),
            module_id: "data-module-id".to_owned(),
        }
    }
}
