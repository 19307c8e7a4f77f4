//! # WireKit demo
//!
//! Bootstraps the framework's test page: one `testModule` with an events table, a
//! `k-click` directive and a `k-model` template, then replays the clicks a visitor
//! would make.
//!
//! ```rust
//! use wirekit_demo::{Demo, DemoConfig};
//!
//! let demo = Demo::builder().config(DemoConfig::default()).build().unwrap();
//! let report = demo.run().unwrap();
//! assert_eq!(report.modules, ["testModule"]);
//! assert!(report.html.contains("Wes Cravens"));
//! ```

mod args;
mod page;

pub use crate::args::Args;
pub use crate::page::{TEST_MODULE, register_test_module, test_page};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use wirekit::Kernel;
use wirekit::kernel::config::KernelConfig;
use wirekit_logger::LoggerSettings;

/// Everything the demo reads from its configuration file.
///
/// ```toml
/// [kernel]
/// id_prefix = "demo-"
///
/// [kernel.options]
/// log_enabled = true
///
/// [logger]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub kernel: KernelConfig,
    pub logger: LoggerSettings,
}

#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct DemoBuilder {
    config: DemoConfig,
}

impl DemoBuilder {
    pub fn config(mut self, config: DemoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn log_enabled(mut self, enabled: bool) -> Self {
        self.config.kernel.options.log_enabled = enabled;
        self
    }

    /// Builds the kernel, registers the enabled features and the test module, and mounts
    /// the test page.
    ///
    /// # Errors
    /// Invalid kernel configuration or a feature that fails to register.
    pub fn build(self) -> Result<Demo> {
        let kernel = Kernel::builder()
            .config(self.config.kernel)
            .build()
            .context("Failed to build the kernel")?;

        let features = wirekit::init(&kernel).context("Failed to register features")?;
        register_test_module(&kernel).context("Failed to register the test module")?;
        test_page(kernel.document()).context("Failed to mount the test page")?;

        info!(features = ?features, "Demo ready");
        Ok(Demo { kernel })
    }
}

#[derive(Debug)]
pub struct Demo {
    kernel: Kernel,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Initialized module names, in bootstrap order.
    pub modules: Vec<String>,
    /// Listeners run by the replayed clicks.
    pub listeners_run: usize,
    /// The whole document after the clicks.
    pub html: String,
}

impl Demo {
    pub fn builder() -> DemoBuilder {
        DemoBuilder::default()
    }

    #[must_use]
    pub const fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Bootstraps the page, clicks the button and the `k-click` element, and renders the
    /// document.
    ///
    /// # Errors
    /// Whatever bootstrap reports, or a page without the expected elements.
    pub fn run(&self) -> Result<Report> {
        let scopes = self.kernel.init().context("Bootstrap failed")?;
        let doc = self.kernel.document();

        let mut listeners_run = 0;
        for selector in [".click-me", "[k-click]"] {
            let target = doc
                .query_all(selector)?
                .into_iter()
                .next()
                .with_context(|| format!("The test page has no '{selector}' element"))?;
            listeners_run += doc.trigger(target, "click")?;
        }

        let html = doc.inner_html(doc.root())?;
        info!(modules = scopes.len(), listeners_run, "Demo finished");

        Ok(Report {
            modules: scopes.iter().map(|scope| scope.name().to_owned()).collect(),
            listeners_run,
            html,
        })
    }
}
