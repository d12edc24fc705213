//! resolve command - Print unit files in dependency order

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::build::{BuildOrder, UnitCache};
use crate::cli::args::UnitArgs;
use crate::cli::Context;
use crate::core::config::schema::validate_extensions;
use crate::core::config::Config;
use crate::ui::output;

/// Print the dependency-first file order for the seed files.
pub fn resolve(ctx: &Context, units: &UnitArgs, json: bool) -> Result<()> {
    let config = ctx.config()?;
    let files = build_order(ctx, &config, units)?;

    if json {
        println!("{}", output::format_paths_json(&files)?);
    } else if !files.is_empty() {
        println!("{}", output::format_paths(&files));
    }
    Ok(())
}

/// Load the seed files and compute their order.
///
/// Command-line unit path and extensions replace the configured ones.
pub(super) fn build_order(ctx: &Context, config: &Config, units: &UnitArgs) -> Result<Vec<PathBuf>> {
    let unit_path = if units.unit_path.is_empty() {
        config.unit_path()
    } else {
        units.unit_path.clone()
    };
    let extensions = if units.extensions.is_empty() {
        config.extensions()
    } else {
        validate_extensions(&units.extensions)?;
        units.extensions.clone()
    };

    output::debug(
        format!("unit path: {:?}, extensions: {:?}", unit_path, extensions),
        ctx.verbosity(),
    );

    let mut cache = UnitCache::new(&ctx.cwd)
        .unit_path(unit_path)
        .extensions(extensions);
    let mut order = BuildOrder::new(&mut cache);
    for file in &units.files {
        order
            .add(file)
            .with_context(|| format!("Failed to load '{}'", file.display()))?;
    }
    let files = order.resolve().context("Failed to resolve build order")?;

    output::debug(
        format!("{} file(s) in build order", files.len()),
        ctx.verbosity(),
    );
    Ok(files)
}
