use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use pph_cli::{Cli, execute, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)?;
    out.flush().context("cannot write output")?;

    Ok(())
}
