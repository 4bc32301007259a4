//! mucalc - Command line calculator
//!
//! Evaluates expressions given as arguments, read line by line from a
//! non-terminal standard input, or typed at an interactive prompt with
//! completion and history.

mod config;
mod editor;
mod help;
mod session;

use crate::config::CalcConfig;
use crate::editor::RustylineEditor;
use crate::session::Session;
use anyhow::{Context, Result};
use clap::Parser;
use mucalc_core::CalcEngine;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mucalc")]
#[command(about = "Evaluate mathematical expressions")]
#[command(after_help = help::AFTER_HELP)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Expressions to evaluate; without any, read from standard input
    #[arg(allow_hyphen_values = true)]
    expressions: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print version information
    #[arg(short = 'V', long, conflicts_with = "expressions")]
    version: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    if cli.version {
        print!("{}", help::long_version());
        return Ok(ExitCode::SUCCESS);
    }

    let config = CalcConfig::load()?;
    init_logging(&config, cli.verbose);
    debug!(?config, "configuration loaded");

    let engine = CalcEngine::new().context("Failed to initialize calculator")?;
    let mut session = Session::new(engine, io::stdout(), io::stderr());

    let status = if !cli.expressions.is_empty() {
        session.run_arguments(&cli.expressions)?
    } else if io::stdin().is_terminal() {
        let registry = Rc::clone(session.engine().registry());
        let mut editor =
            RustylineEditor::new(registry, config.history_path(), config.history_size)?;
        session.run_interactive(&mut editor)?
    } else {
        session.run_batch(io::stdin().lock())?
    };

    debug!(?status, "session finished");
    Ok(status.into())
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`, which wins over the
/// configured level.
fn init_logging(config: &CalcConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
