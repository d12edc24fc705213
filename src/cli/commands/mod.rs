//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Merges command flags over the loaded configuration
//! 2. Calls into the library to do the work
//! 3. Formats and displays output

mod completion;
mod concat;
mod config_cmd;
mod resolve;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use concat::concat;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use resolve::resolve;

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Resolve { units, json } => resolve::resolve(ctx, &units, json),
        Command::Concat {
            units,
            output,
            banner,
            separator,
        } => concat::concat(
            ctx,
            &units,
            output.as_deref(),
            banner.as_deref(),
            separator.as_deref(),
        ),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell, &mut std::io::stdout()),
    }
}
