//! permit-filler - batch-fill permit PDFs from a spreadsheet
//!
//! Logging is controlled with `RUST_LOG` (defaults to `info`).

mod cli;
mod prompt;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    Cli::parse().run()
}
