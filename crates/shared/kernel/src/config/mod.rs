mod kernel;

pub use kernel::{AttributeConfig, KernelConfig};

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[wirekit_derive::wire_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration file and overlays environment overrides.
///
/// 1. **Base file**: `path`, or `wirekit` in the working directory when `None`. The
///    extension is optional; the `config` crate probes the supported formats.
/// 2. **Environment**: variables prefixed with `WIREKIT__`, nested with `__`
///    (`WIREKIT__OPTIONS__LOG_ENABLED=true` maps to `options.log_enabled`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file cannot be found or read, or if the merged
/// values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use wirekit_kernel::config::{KernelConfig, load_config};
///
/// let cfg: KernelConfig = load_config(Some("config/local")).unwrap_or_default();
/// assert_eq!(cfg.id_prefix, "module-");
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from("wirekit"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("WIREKIT")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
