//! Gumup - a dependency-ordered unit registry
//!
//! Units are named, hierarchically addressed pieces of a program: a deferred
//! constructor plus the names of the units it needs. Gumup computes an
//! initialization order from those names and builds every unit exactly
//! once, after everything it depends on.
//!
//! # Architecture
//!
//! - [`core`] - Name types, dependency graph resolution, configuration
//! - [`namespace`] - The live registry: declare, pick, init
//! - [`build`] - File mode: order and concatenate unit source files
//! - [`cli`] - Command-line interface for file mode
//! - [`ui`] - User-facing output
//!
//! # Guarantees
//!
//! 1. Every unit runs once, strictly after its dependencies
//! 2. A cycle or a missing dependency fails before any unit runs
//! 3. Wildcard requirements match the units declared when resolution runs
//! 4. A namespace is sealed by `init` and never reopens

pub mod build;
pub mod cli;
pub mod core;
pub mod namespace;
pub mod ui;
