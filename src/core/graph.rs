//! core::graph
//!
//! Dependency expansion, cycle detection and ordering.
//!
//! # Architecture
//!
//! The dependency graph is a DAG where:
//! - Nodes are declared units
//! - Edges point from a unit to each unit it requires
//! - Roots are units nothing depends on
//!
//! Requirements may be wildcards, so the raw graph is only known once the
//! whole table is present. [`resolve`] expands every requirement against the
//! table as it stands at that moment and produces a [`ResolvedGraph`] with
//! concrete edges. The graph is then walked depth-first, dependencies first,
//! by both the live initializer and the file-mode build order.
//!
//! # Invariants
//!
//! - A resolved graph is acyclic
//! - A wildcard never makes a unit depend on itself
//! - Every unit is reachable from the root set

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use super::types::{RequireName, Target, UnitName};

/// Errors from dependency resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("invalid dependency '{requirement}'{}", required_by(.unit))]
    UnresolvableDependency {
        /// The unit whose requirement failed, if any
        unit: Option<UnitName>,
        /// The requirement that matched nothing
        requirement: RequireName,
    },

    #[error("recursive dependency '{unit}' ({})", join_stack(.stack))]
    RecursiveDependency {
        /// The unit that closed the cycle
        unit: UnitName,
        /// The active stack, ending with `unit`
        stack: Vec<UnitName>,
    },
}

pub(crate) fn required_by(unit: &Option<UnitName>) -> String {
    match unit {
        Some(unit) => format!(" required by '{}'", unit),
        None => String::new(),
    }
}

pub(crate) fn join_stack(stack: &[UnitName]) -> String {
    stack
        .iter()
        .map(UnitName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A table of units and their raw requirements.
///
/// Implemented by the namespace declaration table and by the file-mode
/// working set.
pub trait DependencySource {
    /// All unit names, in insertion order.
    fn unit_names(&self) -> impl Iterator<Item = &UnitName>;

    /// Whether a unit with this exact name exists.
    fn contains(&self, name: &str) -> bool;

    /// Raw requirements of a unit, in declaration order.
    ///
    /// Unknown units have no requirements.
    fn requirements(&self, name: &str) -> &[RequireName];
}

impl DependencySource for IndexMap<UnitName, Vec<RequireName>> {
    fn unit_names(&self) -> impl Iterator<Item = &UnitName> {
        self.keys()
    }

    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn requirements(&self, name: &str) -> &[RequireName] {
        self.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Expand a requirement into the concrete unit names it denotes.
///
/// - `*` matches every unit except `owner`
/// - `foo.*` matches every unit whose name starts with `foo.`, except `owner`
/// - `foo` must name an existing unit
///
/// Wildcard matches come back in insertion order.
///
/// # Errors
///
/// Returns `GraphError::UnresolvableDependency` if an exact requirement
/// names a unit that does not exist.
///
/// # Example
///
/// ```
/// use gumup::core::graph::expand;
/// use gumup::core::types::{RequireName, UnitName};
/// use indexmap::IndexMap;
///
/// let mut table: IndexMap<UnitName, Vec<RequireName>> = IndexMap::new();
/// for name in ["a", "a.b", "a.c", "d"] {
///     table.insert(UnitName::new(name).unwrap(), Vec::new());
/// }
///
/// let req = RequireName::new("a.*").unwrap();
/// let names: Vec<_> = expand(&table, &req, None).unwrap();
/// assert_eq!(names, vec![UnitName::new("a.b").unwrap(), UnitName::new("a.c").unwrap()]);
/// ```
pub fn expand<S: DependencySource>(
    source: &S,
    requirement: &RequireName,
    owner: Option<&UnitName>,
) -> Result<Vec<UnitName>, GraphError> {
    let not_owner = |name: &&UnitName| owner.map_or(true, |o| *name != o);

    let names = match requirement.target() {
        Target::All => source.unit_names().filter(not_owner).cloned().collect(),
        Target::Prefix(prefix) => source
            .unit_names()
            .filter(|name| name.as_str().starts_with(prefix))
            .filter(not_owner)
            .cloned()
            .collect(),
        Target::Exact(_) => match requirement.unit_name() {
            Some(name) if source.contains(name.as_str()) => vec![name],
            _ => {
                return Err(GraphError::UnresolvableDependency {
                    unit: owner.cloned(),
                    requirement: requirement.clone(),
                })
            }
        },
    };

    tracing::trace!(requirement = %requirement, matched = ?names, "expanded requirement");
    Ok(names)
}

/// A dependency graph with every wildcard expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedGraph {
    /// Concrete dependencies per unit
    edges: IndexMap<UnitName, Vec<UnitName>>,
    /// Units without incoming edges, in insertion order
    roots: Vec<UnitName>,
}

impl ResolvedGraph {
    /// Concrete dependencies of a unit.
    pub fn dependencies(&self, name: &str) -> Option<&[UnitName]> {
        self.edges.get(name).map(Vec::as_slice)
    }

    /// Units nothing depends on.
    pub fn roots(&self) -> &[UnitName] {
        &self.roots
    }

    /// Number of units in the graph.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no units.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Depth-first walk from `start`, calling `visit` on each unit after
    /// all of its dependencies.
    ///
    /// Units already in `visited` are skipped, so repeated calls with the
    /// same set never visit a unit twice.
    pub fn walk<E>(
        &self,
        start: &UnitName,
        visited: &mut HashSet<UnitName>,
        visit: &mut impl FnMut(&UnitName) -> Result<(), E>,
    ) -> Result<(), E> {
        if !visited.insert(start.clone()) {
            return Ok(());
        }
        if let Some(deps) = self.edges.get(start) {
            for dep in deps {
                self.walk(dep, visited, visit)?;
            }
        }
        visit(start)
    }

    /// Every unit, dependencies first, walking from the roots.
    ///
    /// # Example
    ///
    /// ```
    /// use gumup::core::graph::resolve;
    /// use gumup::core::types::{RequireName, UnitName};
    /// use indexmap::IndexMap;
    ///
    /// let mut table: IndexMap<UnitName, Vec<RequireName>> = IndexMap::new();
    /// table.insert(UnitName::new("app").unwrap(), vec![RequireName::new("lib").unwrap()]);
    /// table.insert(UnitName::new("lib").unwrap(), vec![]);
    ///
    /// let order: Vec<String> = resolve(&table)
    ///     .unwrap()
    ///     .order()
    ///     .into_iter()
    ///     .map(String::from)
    ///     .collect();
    /// assert_eq!(order, vec!["lib", "app"]);
    /// ```
    pub fn order(&self) -> Vec<UnitName> {
        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.edges.len());
        for root in &self.roots {
            let _ = self.walk(root, &mut visited, &mut |name| {
                order.push(name.clone());
                Ok::<(), std::convert::Infallible>(())
            });
        }
        order
    }
}

/// Expand every unit's requirements and check the graph for cycles.
///
/// Dependencies are expanded in declaration order, recursing into each
/// dependency before moving on, so a unit's concrete list is always built
/// after the lists of everything it reaches.
///
/// # Errors
///
/// - `GraphError::UnresolvableDependency` if an exact requirement names a
///   unit that does not exist
/// - `GraphError::RecursiveDependency` if the expanded graph has a cycle
pub fn resolve<S: DependencySource>(source: &S) -> Result<ResolvedGraph, GraphError> {
    let mut resolver = Resolver {
        source,
        edges: IndexMap::new(),
        roots: source.unit_names().cloned().collect(),
        stack: IndexSet::new(),
    };

    for name in source.unit_names() {
        resolver.visit(name)?;
    }

    tracing::debug!(
        units = resolver.edges.len(),
        roots = resolver.roots.len(),
        "resolved dependency graph"
    );

    Ok(ResolvedGraph {
        edges: resolver.edges,
        roots: resolver.roots.into_iter().collect(),
    })
}

struct Resolver<'a, S> {
    source: &'a S,
    /// Units already resolved, with their concrete dependencies
    edges: IndexMap<UnitName, Vec<UnitName>>,
    /// Units with no incoming edge seen so far
    roots: IndexSet<UnitName>,
    /// Units in progress on the active recursion path
    stack: IndexSet<UnitName>,
}

impl<S: DependencySource> Resolver<'_, S> {
    fn visit(&mut self, name: &UnitName) -> Result<(), GraphError> {
        if self.edges.contains_key(name) {
            return Ok(());
        }
        if !self.stack.insert(name.clone()) {
            let mut stack: Vec<UnitName> = self.stack.iter().cloned().collect();
            stack.push(name.clone());
            return Err(GraphError::RecursiveDependency {
                unit: name.clone(),
                stack,
            });
        }

        let source = self.source;
        let mut concrete = Vec::new();
        for requirement in source.requirements(name.as_str()) {
            for dep in expand(source, requirement, Some(name))? {
                self.roots.shift_remove(&dep);
                self.visit(&dep)?;
                concrete.push(dep);
            }
        }

        self.stack.pop();
        self.edges.insert(name.clone(), concrete);
        Ok(())
    }
}
