//! concat command - Concatenate unit files in dependency order

use std::path::Path;

use anyhow::{Context as _, Result};

use super::resolve::build_order;
use crate::build;
use crate::cli::args::UnitArgs;
use crate::cli::Context;
use crate::ui::output;

/// Concatenate the build order of the seed files.
///
/// Flag values for banner and separator override the configuration.
pub fn concat(
    ctx: &Context,
    units: &UnitArgs,
    out: Option<&Path>,
    banner: Option<&str>,
    separator: Option<&str>,
) -> Result<()> {
    let config = ctx.config()?;
    let files = build_order(ctx, &config, units)?;

    let mut options = config.concat_options();
    if let Some(banner) = banner {
        options.banner = Some(banner.to_string());
    }
    if let Some(separator) = separator {
        options.separator = separator.to_string();
    }

    let text = build::concat(&ctx.cwd, &files, &options).context("Failed to concatenate units")?;

    match out {
        Some(out) => {
            let path = ctx.cwd.join(out);
            build::write_output(&path, &text).context("Failed to write output")?;
            output::print(
                format!("Wrote {} unit file(s) to {}", files.len(), out.display()),
                ctx.verbosity(),
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}
