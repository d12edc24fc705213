//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Gumup - dependency-ordered unit files
#[derive(Parser, Debug)]
#[command(name = "gumup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gumup was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Unit files and lookup overrides shared by the build commands.
#[derive(Args, Debug, Clone)]
pub struct UnitArgs {
    /// Seed unit files, relative to the working directory
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Directory searched for units (repeatable, replaces the configured path)
    #[arg(long = "unit-path", value_name = "DIR")]
    pub unit_path: Vec<PathBuf>,

    /// Extension tried for unit lookup (repeatable, replaces the configured list)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print unit files in dependency order
    #[command(
        name = "resolve",
        long_about = "Print unit files in dependency order.\n\n\
            Each seed file is scanned for its @unit and @require directives. \
            Required units are found on the unit path as <dir>/a/b/c.<ext> for a \
            unit named a.b.c. Files are printed dependencies first, each once.",
        after_help = "\
EXAMPLES:
    # Order the files an app needs
    gumup resolve src/app.js --unit-path src

    # Machine-readable output
    gumup resolve src/app.js --json"
    )]
    Resolve {
        #[command(flatten)]
        units: UnitArgs,

        /// Print a JSON array instead of one path per line
        #[arg(long)]
        json: bool,
    },

    /// Concatenate unit files in dependency order
    #[command(
        name = "concat",
        after_help = "\
EXAMPLES:
    # Bundle an app into dist/app.js
    gumup concat src/app.js --unit-path src -o dist/app.js

    # Write to stdout with a banner
    gumup concat src/app.js --banner '// bundle'"
    )]
    Concat {
        #[command(flatten)]
        units: UnitArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Text written before the first file
        #[arg(long)]
        banner: Option<String>,

        /// Text written between files
        #[arg(long)]
        separator: Option<String>,
    },

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        long_about = "Get, set, or list configuration values.\n\n\
            Project configuration lives in gumup.toml in the working directory. \
            Global configuration is read from $GUMUP_CONFIG, \
            $XDG_CONFIG_HOME/gumup/config.toml or ~/.gumup/config.toml.",
        after_help = "\
EXAMPLES:
    # Show the effective configuration
    gumup config list

    # Search src and vendor for units
    gumup config set unit_path src,vendor"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    gumup completion bash > ~/.local/share/bash-completion/completions/gumup
    gumup completion zsh > ~/.zfunc/_gumup"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value in the project config
    Set {
        /// Configuration key
        key: String,
        /// Value to set (comma-separated for lists)
        value: String,
    },
    /// List all configuration values
    List,
}
