//! Dry-cleaning console - interactive menu over the shop's collections.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use drycleaning::{Cli, Config, Session, StdConsole, store};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the menus.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    tracing::debug!(?config, "configuration loaded");

    let store = match store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red());
            std::process::exit(1);
        }
    };

    let mut console = StdConsole::stdio();
    Session::new(&*store, &mut console).run()?;

    Ok(())
}
