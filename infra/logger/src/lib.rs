//! # Logger
//!
//! Console and rolling-file logging for `WireKit` applications, on top of
//! `tracing-subscriber`. The framework itself only emits `tracing` events; applications
//! pick where they go with [`Logger::builder`] or, from a config file, with
//! [`Logger::from_settings`].
//!
//! * Console output is compact by default; see [`LogFormat`].
//! * File output rolls over with [`Rotation`] and runs on a non-blocking worker, so the
//!   returned [`Logger`] must stay alive until shutdown.
//! * [`LoggerBuilder::env_filter`] adds directives such as `"wirekit=debug"`; without it
//!   `RUST_LOG` is honoured.
//!
//! ## Example
//!
//! ```rust
//! # use wirekit_logger::{Logger, LevelFilter, LogFormat};
//!
//! let _logger = Logger::builder()
//!     .name("demo")
//!     .format(LogFormat::Pretty)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;
mod settings;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::settings::{FileRotation, FileSettings, LogFormat, LoggerSettings};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use crate::settings::{DEFAULT_MAX_FILES, DEFAULT_NAME};
use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    format: LogFormat,
    level: LevelFilter,
    env_filter: Option<String>,
    path: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            format: LogFormat::Compact,
            level: LevelFilter::INFO,
            env_filter: None,
            path: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct ConsoleOnly;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}
impl Sealed for ConsoleOnly {}
impl Sealed for WithFile {}

/// Configures the global subscriber. A name is required before [`LoggerBuilder::init`]
/// becomes available; file options only exist once a path is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed, F: Sealed = ConsoleOnly> {
    config: LoggerConfig,
    name: N,
    output: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the application; also the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { config: self.config, name: Named(name.into()), output: PhantomData }
    }
}

impl LoggerBuilder<Named, WithFile> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the file as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds filter directives (e.g. `wirekit=debug`). Replaces `RUST_LOG`; an invalid
    /// filter makes [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Directory for rolling log files; created on init.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, output: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file worker guard, if any; keep it alive for as
    /// long as logs should be written.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, a bad
    /// filter or no output at all. [`LoggerError::Appender`] when the file appender fails.
    /// [`LoggerError::Subscriber`] when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate(&self.config, &name)?;
        let filter = env_filter(&self.config)?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if self.config.console {
            layers.push(console_layer(self.config.format));
        }

        let guard = match &self.config.path {
            Some(path) => {
                let (file, guard) = file_layer(&self.config, path.clone(), &name)?;
                layers.push(file);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::invalid_configuration(
                "no output enabled, turn on the console or set a file path",
            ));
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        tracing::debug!(logger = %name, file = guard.is_some(), "Logger initialized");

        Ok(Logger { guard })
    }
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    let console = layer().with_ansi(true);
    match format {
        LogFormat::Compact => console.compact().boxed(),
        LogFormat::Pretty => console.pretty().boxed(),
        LogFormat::Json => console.with_ansi(false).json().boxed(),
    }
}

fn file_layer(
    config: &LoggerConfig,
    path: PathBuf,
    name: &str,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&path).map_err(|err| LoggerError::Internal {
        message: err.to_string().into(),
        context: Some(format!("Failed to create log directory {}", path.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(path)
        .context("building the rolling file appender")?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = layer().with_writer(writer).with_ansi(false);
    let boxed = if config.json { file.json().boxed() } else { file.boxed() };
    Ok((boxed, guard))
}

/// Handle to the installed logging system. Dropping it stops the file worker after
/// flushing what is buffered.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// ```rust
    /// use wirekit_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder().name("demo").level(LevelFilter::WARN).init().unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: Unnamed, output: PhantomData }
    }

    /// Builds and installs the logger described by `settings`.
    ///
    /// # Errors
    /// Everything [`LoggerBuilder::init`] reports, plus an unknown level name.
    pub fn from_settings(settings: &LoggerSettings) -> Result<Self, LoggerError> {
        let name: &str = if settings.name.trim().is_empty() { DEFAULT_NAME } else { &settings.name };
        let builder = Self::builder()
            .name(name)
            .console(settings.console)
            .format(settings.format)
            .level(settings.level_filter()?);
        let builder = match &settings.filter {
            Some(filter) => builder.env_filter(filter),
            None => builder,
        };

        let Some(file) = &settings.file else {
            return builder.init();
        };
        let builder =
            builder.path(&file.path).rotation(file.rotation.into()).max_files(file.max_files);
        if file.json { builder.json().init() } else { builder.init() }
    }

    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::invalid_configuration("logger name cannot be empty"));
    }
    if config.max_files == 0 {
        return Err(LoggerError::invalid_configuration("max_files must be greater than zero"));
    }
    Ok(())
}

fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder.parse(filter).map_err(|err| {
            LoggerError::invalid_configuration(format!("invalid filter '{filter}': {err}"))
        }),
    }
}
