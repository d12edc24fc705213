//! ui
//!
//! User-facing output.
//!
//! # Design
//!
//! Commands print through [`output`] so `--quiet` and `--debug` behave the
//! same everywhere. Diagnostics for developers go through `tracing`
//! instead.

pub mod output;
