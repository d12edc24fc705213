//! namespace::init
//!
//! Runs unit implementations over a resolved graph.
//!
//! Units are initialized depth-first from the root set, each one after all
//! of its concrete dependencies and exactly once.

use std::collections::HashSet;

use super::declaration::{DeclarationTable, Implementation, Units};
use super::error::NamespaceError;
use super::tree;
use crate::core::graph::ResolvedGraph;
use crate::core::types::UnitName;

/// Initialize every unit of `graph` into `units`.
pub(crate) fn initialize(
    graph: &ResolvedGraph,
    table: &DeclarationTable,
    units: &mut Units,
) -> Result<(), NamespaceError> {
    let mut initialized = HashSet::with_capacity(graph.len());
    for root in graph.roots() {
        graph.walk(root, &mut initialized, &mut |name| {
            initialize_unit(table, units, name)
        })?;
    }
    tracing::debug!(units = initialized.len(), "namespace initialized");
    Ok(())
}

fn initialize_unit(
    table: &DeclarationTable,
    units: &mut Units,
    name: &UnitName,
) -> Result<(), NamespaceError> {
    let declaration = table
        .get(name.as_str())
        .ok_or_else(|| NamespaceError::UnknownUnit(name.to_string()))?;
    tracing::debug!(unit = %name, shape = ?declaration.shape(), "initializing unit");

    let failed = |source: anyhow::Error| NamespaceError::UnitFailed {
        unit: name.clone(),
        source,
    };

    match declaration.implementation() {
        Implementation::Augment(f) => {
            // `this` is a working copy; the tree keeps the node as it was
            // until the call succeeds.
            let mut this = tree::node(units, name)?.clone();
            f(&mut this, units).map_err(failed)?;
            *tree::node(units, name)? = this;
            Ok(())
        }
        Implementation::Factory(f) => {
            let value = f(units).map_err(failed)?;
            tree::place(units, name, value)
        }
    }
}
