//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GUMUP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gumup/config.toml`
//! 3. `~/.gumup/config.toml` (canonical write location)
//!
//! # Project Config
//!
//! Located at `gumup.toml` in the project directory (canonical).
//!
//! # Validation
//!
//! Config values are validated after parsing: extensions must be bare
//! (`js`, not `.js`) and unit path entries must be non-empty.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// extensions = ["js", "mjs"]
///
/// [concat]
/// separator = ";\n"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Extensions tried when looking a unit up by name
    pub extensions: Option<Vec<String>>,

    /// Concatenation defaults
    pub concat: Option<ConcatDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(extensions) = &self.extensions {
            validate_extensions(extensions)?;
        }
        Ok(())
    }
}

/// Project configuration.
///
/// # Example
///
/// ```toml
/// unit_path = ["src", "vendor"]
/// extensions = ["js"]
///
/// [concat]
/// banner = "// app bundle\n"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directories searched for units, relative to the project directory
    pub unit_path: Option<Vec<PathBuf>>,

    /// Extensions tried when looking a unit up by name
    pub extensions: Option<Vec<String>>,

    /// Concatenation defaults
    pub concat: Option<ConcatDefaults>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(unit_path) = &self.unit_path {
            if unit_path.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "unit_path cannot be empty".to_string(),
                ));
            }
            if unit_path.iter().any(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "unit_path entries cannot be empty".to_string(),
                ));
            }
        }

        if let Some(extensions) = &self.extensions {
            validate_extensions(extensions)?;
        }

        Ok(())
    }
}

/// Concatenation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConcatDefaults {
    /// Text written before the first file
    pub banner: Option<String>,

    /// Text written between files
    pub separator: Option<String>,
}

/// Check an extension list.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an empty list, or for an
/// extension that is empty, starts with a dot or contains a separator.
pub fn validate_extensions(extensions: &[String]) -> Result<(), ConfigError> {
    if extensions.is_empty() {
        return Err(ConfigError::InvalidValue(
            "extensions cannot be empty".to_string(),
        ));
    }
    for ext in extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue(format!(
                "invalid extension '{}', expected a bare extension like 'js'",
                ext
            )));
        }
    }
    Ok(())
}
