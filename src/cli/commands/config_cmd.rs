//! config command - Get, set, or list configuration values

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::config::{ConcatDefaults, Config, ProjectConfig};
use crate::ui::output;

/// Keys understood by `get` and `set`.
const KEYS: &[&str] = &["unit_path", "extensions", "concat.banner", "concat.separator"];

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown configuration key: {} (expected one of: {})",
        key,
        KEYS.join(", ")
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = ctx.config()?;

    let value = match key {
        "unit_path" => config
            .unit_path()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(","),
        "extensions" => config.extensions().join(","),
        "concat.banner" => config.banner().unwrap_or_default().to_string(),
        "concat.separator" => config.separator().to_string(),
        _ => return Err(unknown_key(key)),
    };

    if !value.is_empty() {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value in the project config.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let loaded = Config::load(Some(&ctx.cwd)).context("Failed to load config")?;
    let mut project = loaded.config.project.unwrap_or_default();

    match key {
        "unit_path" => {
            let dirs: Vec<PathBuf> = split_list(value).into_iter().map(PathBuf::from).collect();
            if dirs.is_empty() {
                bail!("unit_path needs at least one directory");
            }
            project.unit_path = Some(dirs);
        }
        "extensions" => project.extensions = Some(split_list(value)),
        "concat.banner" => concat_section(&mut project).banner = Some(value.to_string()),
        "concat.separator" => concat_section(&mut project).separator = Some(value.to_string()),
        _ => return Err(unknown_key(key)),
    }

    let path = Config::write_project(&ctx.cwd, &project).context("Failed to write config")?;
    output::print(
        format!("Set {} = {} in {}", key, value, path.display()),
        ctx.verbosity(),
    );
    Ok(())
}

fn concat_section(project: &mut ProjectConfig) -> &mut ConcatDefaults {
    project.concat.get_or_insert_with(ConcatDefaults::default)
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    println!("# Effective Configuration");
    match config.global_config_loaded_from() {
        Some(path) => println!("# global: {}", path.display()),
        None => println!("# global: (defaults)"),
    }
    match config.project_config_loaded_from() {
        Some(path) => println!("# project: {}", path.display()),
        None => println!("# project: (defaults)"),
    }

    let effective =
        toml::to_string_pretty(&config.effective()).context("Failed to format config")?;
    print!("{}", effective);
    Ok(())
}
