//! gumup binary entry point.

use std::process::ExitCode;

use gumup::cli::{self, Cli};
use gumup::ui::output;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let default = if debug { "gumup=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    match cli::run_with(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(output::format_error_chain(&err));
            ExitCode::FAILURE
        }
    }
}
