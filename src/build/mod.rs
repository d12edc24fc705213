//! build
//!
//! File mode: the dependency order of unit source files.
//!
//! # Overview
//!
//! The live [`crate::namespace`] engine runs unit code. File mode computes
//! the same order without running anything, so a build step can
//! concatenate unit files in a loadable sequence.
//!
//! - [`scanner`] - Reads `@unit` / `@require` directives out of source text
//! - [`cache`] - Loads unit files and finds them by unit name
//! - [`order`] - Computes the dependency-first file list
//! - [`concat`] - Joins files in that order
//!
//! # Example
//!
//! ```no_run
//! use gumup::build::{BuildOrder, UnitCache};
//!
//! let mut cache = UnitCache::new("/path/to/project").unit_path(["src"]);
//! let mut order = BuildOrder::new(&mut cache);
//! order.add("src/app.js").unwrap();
//! for file in order.resolve().unwrap() {
//!     println!("{}", file.display());
//! }
//! ```

pub mod cache;
pub mod concat;
pub mod order;
pub mod scanner;

pub use cache::{UnitCache, UnitId, UnitRecord, UnitSource};
pub use concat::{concat, write_output, ConcatOptions};
pub use order::BuildOrder;
pub use scanner::{DeclarationScanner, DirectiveScanner, ScanError, ScannedUnit};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::graph::{join_stack, required_by, GraphError};
use crate::core::types::{RequireName, UnitName};

/// Errors from file mode.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read unit file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: ScanError,
    },

    #[error("unit '{name}' not found (tried {})", display_paths(.tried))]
    UnitNotFound { name: UnitName, tried: Vec<PathBuf> },

    #[error("file '{path}' declares unit '{found}', expected '{expected}'")]
    NameMismatch {
        path: PathBuf,
        expected: UnitName,
        found: UnitName,
    },

    #[error("unit '{name}' is declared by both '{}' and '{}'", .first.display(), .second.display())]
    DuplicateUnit {
        name: UnitName,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid dependency '{requirement}'{}", required_by(.unit))]
    UnresolvableDependency {
        unit: Option<UnitName>,
        requirement: RequireName,
    },

    #[error("recursive dependency '{unit}' ({})", join_stack(.stack))]
    RecursiveDependency {
        unit: UnitName,
        stack: Vec<UnitName>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no unit path".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<GraphError> for BuildError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnresolvableDependency { unit, requirement } => {
                BuildError::UnresolvableDependency { unit, requirement }
            }
            GraphError::RecursiveDependency { unit, stack } => {
                BuildError::RecursiveDependency { unit, stack }
            }
        }
    }
}
