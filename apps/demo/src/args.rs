//! Command-line arguments of the demo binary.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "wirekit-demo")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bootstraps the WireKit test page and replays a few clicks")]
pub struct Args {
    /// Configuration file (any format the `config` crate reads); built-in defaults when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Force the framework's own `LOG` switch on
    #[arg(long)]
    pub log_enabled: bool,

    /// Print the rendered page to stdout when done
    #[arg(long)]
    pub print: bool,
}
