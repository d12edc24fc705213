//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Gumup has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Per-project overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GUMUP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gumup/config.toml`
//! 3. `~/.gumup/config.toml`
//!
//! # Project Config Locations
//!
//! Searched in order:
//! 1. `gumup.toml` (canonical)
//! 2. `.gumup/config.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use gumup::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Unit path: {:?}", config.unit_path());
//! println!("Extensions: {:?}", config.extensions());
//! ```

pub mod schema;

pub use schema::{ConcatDefaults, GlobalConfig, ProjectConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::build::ConcatOptions;

/// Canonical project config file name.
pub const PROJECT_CONFIG_FILE: &str = "gumup.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: project config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if found)
    pub project: Option<ProjectConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads project config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global_path = Self::global_candidates().into_iter().find(|p| p.exists());
        Self::load_from(global_path.as_deref(), project_dir)
    }

    /// Load configuration from an explicit global file.
    ///
    /// `global_path` of `None` means global defaults.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let global = match global_path {
            Some(path) => Self::read_config::<GlobalConfig>(path)?,
            None => GlobalConfig::default(),
        };

        let (project, project_path) = match project_dir {
            Some(dir) => Self::load_project(dir, &mut warnings)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        for warning in &warnings {
            tracing::warn!(path = %warning.path.display(), "{}", warning.message);
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path: global_path.map(Path::to_path_buf),
                project_path,
            },
            warnings,
        })
    }

    /// Global config candidates, in search order.
    fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("GUMUP_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("gumup/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".gumup/config.toml"));
        }
        candidates
    }

    /// Load project configuration from standard locations.
    fn load_project(
        project_dir: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<ProjectConfig>, Option<PathBuf>), ConfigError> {
        let canonical = Self::project_config_path(project_dir);
        if canonical.exists() {
            let config = Self::read_config(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        let compat = project_dir.join(".gumup/config.toml");
        if compat.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please move to '{}'",
                    canonical.display()
                ),
                path: compat.clone(),
            });
            let config = Self::read_config(&compat)?;
            return Ok((Some(config), Some(compat)));
        }

        Ok((None, None))
    }

    /// Read and parse a config file.
    fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for project config.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Write project config atomically.
    ///
    /// Validates first, then writes to a temp file and renames it over
    /// `gumup.toml`.
    pub fn write_project(project_dir: &Path, config: &ProjectConfig) -> Result<PathBuf, ConfigError> {
        config.validate()?;
        let path = Self::project_config_path(project_dir);
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        let write_error = |path: &Path, source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| write_error(&temp_path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| write_error(&temp_path, e))?;
        file.sync_all().map_err(|e| write_error(&temp_path, e))?;

        fs::rename(&temp_path, path).map_err(|e| write_error(path, e))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Directories searched for units.
    ///
    /// Defaults to `["."]` if not configured.
    pub fn unit_path(&self) -> Vec<PathBuf> {
        self.project
            .as_ref()
            .and_then(|p| p.unit_path.clone())
            .unwrap_or_else(|| vec![PathBuf::from(".")])
    }

    /// Extensions tried for unit lookup.
    ///
    /// Defaults to `["js"]` if not configured.
    pub fn extensions(&self) -> Vec<String> {
        self.project
            .as_ref()
            .and_then(|p| p.extensions.clone())
            .or_else(|| self.global.extensions.clone())
            .unwrap_or_else(|| vec!["js".to_string()])
    }

    fn concat_value(&self, pick: impl Fn(&ConcatDefaults) -> Option<&String>) -> Option<&str> {
        let project = self.project.as_ref().and_then(|p| p.concat.as_ref());
        project
            .and_then(&pick)
            .or_else(|| self.global.concat.as_ref().and_then(&pick))
            .map(String::as_str)
    }

    /// Concatenation banner, if any.
    pub fn banner(&self) -> Option<&str> {
        self.concat_value(|c| c.banner.as_ref())
    }

    /// Separator written between concatenated files.
    ///
    /// Defaults to a newline if not configured.
    pub fn separator(&self) -> &str {
        self.concat_value(|c| c.separator.as_ref()).unwrap_or("\n")
    }

    /// Concatenation options with precedence applied.
    pub fn concat_options(&self) -> ConcatOptions {
        ConcatOptions {
            banner: self.banner().map(str::to_string),
            separator: self.separator().to_string(),
        }
    }

    /// Every setting with defaults filled in, in project schema form.
    pub fn effective(&self) -> ProjectConfig {
        ProjectConfig {
            unit_path: Some(self.unit_path()),
            extensions: Some(self.extensions()),
            concat: Some(ConcatDefaults {
                banner: self.banner().map(str::to_string),
                separator: Some(self.separator().to_string()),
            }),
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}
