//! build::order
//!
//! Dependency-first ordering of unit files.
//!
//! # Algorithm
//!
//! 1. Load the working set: every seed file plus everything its exact
//!    requirements reach, found through the [`UnitSource`]
//! 2. Resolve the working set with [`graph::resolve`], the same expansion
//!    and cycle check the live namespace uses
//! 3. Walk the resolved graph from each seed in turn, emitting each file
//!    after its dependencies and never twice
//!
//! Wildcard requirements never load files. They match whatever the exact
//! requirements pulled into the working set.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::cache::{UnitId, UnitSource};
use super::BuildError;
use crate::core::graph;
use crate::core::types::{RequireName, UnitName};

/// Builds a file order from seed files.
pub struct BuildOrder<'s, S: UnitSource> {
    source: &'s mut S,
    seeds: Vec<UnitId>,
}

impl<'s, S: UnitSource> BuildOrder<'s, S> {
    /// Create an empty order over `source`.
    pub fn new(source: &'s mut S) -> Self {
        Self {
            source,
            seeds: Vec::new(),
        }
    }

    /// Add a seed file.
    pub fn add(&mut self, file: impl AsRef<Path>) -> Result<(), BuildError> {
        let id = self.source.read_file(file.as_ref())?;
        if !self.seeds.contains(&id) {
            self.seeds.push(id);
        }
        Ok(())
    }

    /// Compute the ordered file list.
    ///
    /// # Errors
    ///
    /// - Loading errors from the source (missing unit, unreadable file, ...)
    /// - `BuildError::UnresolvableDependency` for an exact requirement on a
    ///   unit that was never loaded
    /// - `BuildError::RecursiveDependency` if the working set has a cycle
    pub fn resolve(&mut self) -> Result<Vec<PathBuf>, BuildError> {
        let working = self.load()?;
        let table: IndexMap<UnitName, Vec<RequireName>> = working
            .iter()
            .map(|(name, &id)| (name.clone(), self.source.record(id).dependencies.clone()))
            .collect();
        let resolved = graph::resolve(&table)?;

        let mut visited = HashSet::with_capacity(working.len());
        let mut files = Vec::with_capacity(working.len());
        for &seed in &self.seeds {
            let start = &self.source.record(seed).name;
            resolved.walk(start, &mut visited, &mut |unit| {
                if let Some(&id) = working.get(unit) {
                    files.push(self.source.record(id).file.clone());
                }
                Ok::<(), BuildError>(())
            })?;
        }

        tracing::debug!(seeds = self.seeds.len(), files = files.len(), "resolved build order");
        Ok(files)
    }

    /// Load the seeds and the closure of their exact requirements.
    fn load(&mut self) -> Result<IndexMap<UnitName, UnitId>, BuildError> {
        let mut working = IndexMap::new();
        let mut queue: VecDeque<UnitId> = self.seeds.iter().copied().collect();

        while let Some(id) = queue.pop_front() {
            let record = self.source.record(id);
            if working.contains_key(&record.name) {
                continue;
            }
            working.insert(record.name.clone(), id);

            let exact: Vec<UnitName> = record
                .dependencies
                .iter()
                .filter_map(RequireName::unit_name)
                .collect();
            for name in exact {
                if !working.contains_key(&name) {
                    queue.push_back(self.source.read_unit(&name)?);
                }
            }
        }
        Ok(working)
    }
}
