//! core
//!
//! Core domain types, graph resolution and configuration for Gumup.
//!
//! # Modules
//!
//! - [`types`] - Strong types: UnitName, RequireName
//! - [`graph`] - Requirement expansion, cycle detection and ordering
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid names at construction time
//! - Schemas are strict and self-describing
//! - Resolution is deterministic: ties break on declaration order

pub mod config;
pub mod graph;
pub mod types;
