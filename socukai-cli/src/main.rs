use anyhow::Context;
use clap::Parser;
use tracing::debug;

use socukai_cli::{Cli, Settings, logging, run};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    logging::init_logging(level, settings.logging.file.as_deref())?;

    debug!(command = ?cli.command, "running");
    let output = run(&cli, &settings)?;
    print!("{output}");

    Ok(())
}
