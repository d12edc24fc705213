//! cli
//!
//! Command-line interface layer for Gumup.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration for the working directory
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call into [`crate::build`] and [`crate::core::config`].

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};

/// Per-invocation state shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory
    pub cwd: PathBuf,
    /// Debug output enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
}

impl Context {
    /// Build a context from parsed flags.
    ///
    /// Falls back to the process working directory when `--cwd` is absent.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = match &cli.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().context("Failed to determine working directory")?,
        };
        Ok(Self {
            cwd,
            debug: cli.debug,
            quiet: cli.quiet,
        })
    }

    /// Output verbosity for these flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Load configuration for the working directory, printing any warnings.
    pub fn config(&self) -> Result<Config> {
        let result = Config::load(Some(&self.cwd)).context("Failed to load config")?;
        for warning in &result.warnings {
            output::warn(
                format!("{} ({})", warning.message, warning.path.display()),
                self.verbosity(),
            );
        }
        Ok(result.config)
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    run_with(Cli::parse_args())
}

/// Run already parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run_with(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli)?;
    commands::dispatch(cli.command, &ctx)
}
