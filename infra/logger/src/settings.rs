//! Serializable logger configuration, meant to live in an application's config file.

use crate::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;

pub(crate) const DEFAULT_NAME: &str = "wirekit";
pub(crate) const DEFAULT_MAX_FILES: usize = 10;

/// Console output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<FileRotation> for Rotation {
    fn from(rotation: FileRotation) -> Self {
        match rotation {
            FileRotation::Minutely => Self::MINUTELY,
            FileRotation::Hourly => Self::HOURLY,
            FileRotation::Daily => Self::DAILY,
            FileRotation::Never => Self::NEVER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub path: PathBuf,
    pub rotation: FileRotation,
    pub max_files: usize,
    pub json: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs"),
            rotation: FileRotation::default(),
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

/// ```toml
/// [logger]
/// name = "demo"
/// level = "debug"
/// filter = "wirekit=trace"
///
/// [logger.file]
/// path = "logs"
/// rotation = "hourly"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Identifier of the application, also the log file prefix.
    pub name: String,
    pub console: bool,
    pub format: LogFormat,
    /// `trace`, `debug`, `info`, `warn`, `error` or `off`.
    pub level: String,
    /// Extra directives such as `wirekit=debug`; `RUST_LOG` is read when unset.
    pub filter: Option<String>,
    /// Rolling file output; console only when absent.
    pub file: Option<FileSettings>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            console: true,
            format: LogFormat::default(),
            level: "info".to_owned(),
            filter: None,
            file: None,
        }
    }
}

impl LoggerSettings {
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an unknown level name.
    pub fn level_filter(&self) -> Result<LevelFilter, LoggerError> {
        LevelFilter::from_str(self.level.trim()).map_err(|err| {
            LoggerError::invalid_configuration(format!("unknown level '{}': {err}", self.level))
        })
    }
}
