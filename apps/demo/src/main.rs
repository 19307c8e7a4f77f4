use anyhow::Context;
use clap::Parser;
use std::io::Write;
use wirekit::kernel::config::load_config;
use wirekit_demo::{Args, Demo, DemoConfig};
use wirekit_logger::Logger;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config: DemoConfig = match &args.config {
        Some(path) => load_config(Some(path)).context("Critical: Configuration is malformed")?,
        None => DemoConfig::default(),
    };
    let _log = Logger::from_settings(&config.logger)?;

    let report = Demo::builder().config(config).log_enabled(args.log_enabled).build()?.run()?;
    tracing::info!(modules = ?report.modules, listeners = report.listeners_run, "Rendered test page");

    if args.print {
        writeln!(std::io::stdout().lock(), "{}", report.html)?;
    }
    Ok(())
}
