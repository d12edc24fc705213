//! namespace::error
//!
//! Errors raised by declaring, picking and initializing units.
//!
//! Every error is fatal for the operation that raised it. A namespace whose
//! `init` failed stays sealed and must be discarded.

use thiserror::Error;

use crate::core::graph::{join_stack, required_by, GraphError};
use crate::core::types::{RequireName, TypeError, UnitName};

/// Errors from namespace operations.
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("invalid unit name '{0}'")]
    InvalidName(String),

    #[error("invalid require name '{0}'")]
    InvalidRequireName(String),

    #[error("unit '{0}' has already been declared")]
    DuplicateUnit(UnitName),

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

    #[error("cannot init unit '{unit}' because '{path}' already holds a value")]
    PathCollision { unit: UnitName, path: String },

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("invalid injection '{name}': {reason}")]
    InvalidInjection { name: String, reason: &'static str },

    #[error("pick settings name units but no source namespace")]
    MissingSource,

    #[error("namespace has already been initialized")]
    NamespaceSealed,

    #[error("unit '{unit}' failed to initialize")]
    UnitFailed {
        unit: UnitName,
        #[source]
        source: anyhow::Error,
    },
}

impl From<TypeError> for NamespaceError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidUnitName(name) => NamespaceError::InvalidName(name),
            TypeError::InvalidRequireName(name) => NamespaceError::InvalidRequireName(name),
        }
    }
}

impl From<GraphError> for NamespaceError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnresolvableDependency { unit, requirement } => {
                NamespaceError::UnresolvableDependency { unit, requirement }
            }
            GraphError::RecursiveDependency { unit, stack } => {
                NamespaceError::RecursiveDependency { unit, stack }
            }
        }
    }
}
