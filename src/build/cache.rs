//! build::cache
//!
//! Unit file loading and lookup.
//!
//! # Design
//!
//! The [`UnitSource`] trait is the boundary between the build order and
//! the file system: it hands out opaque [`UnitId`]s for files and unit
//! names, and a [`UnitRecord`] for each id. [`UnitCache`] is the stock
//! implementation.
//!
//! # Unit lookup
//!
//! A unit named `a.b.c` is searched as `<dir>/a/b/c.<ext>` for each
//! directory of the unit path and each extension, in that order. The first
//! file that exists wins and must declare the unit it was looked up by.
//! Relative unit path directories and files are taken relative to the
//! working directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::scanner::{DeclarationScanner, DirectiveScanner};
use super::BuildError;
use crate::core::types::{RequireName, UnitName};

/// Opaque handle to a loaded unit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub(crate) usize);

/// A unit file and what it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    /// Declared unit name
    pub name: UnitName,
    /// Path as given or as found on the unit path
    pub file: PathBuf,
    /// Raw requirements, in declaration order
    pub dependencies: Vec<RequireName>,
}

/// Loads unit records by file or by unit name.
pub trait UnitSource {
    /// Load the unit declared in `path`.
    fn read_file(&mut self, path: &Path) -> Result<UnitId, BuildError>;

    /// Find and load the file declaring unit `name`.
    fn read_unit(&mut self, name: &UnitName) -> Result<UnitId, BuildError>;

    /// The record behind an id handed out by this source.
    fn record(&self, id: UnitId) -> &UnitRecord;
}

/// File-backed [`UnitSource`] that reads each file once.
#[derive(Debug)]
pub struct UnitCache<S = DirectiveScanner> {
    cwd: PathBuf,
    unit_path: Vec<PathBuf>,
    extensions: Vec<String>,
    scanner: S,
    records: Vec<UnitRecord>,
    by_file: HashMap<PathBuf, UnitId>,
    by_name: HashMap<UnitName, UnitId>,
}

impl UnitCache<DirectiveScanner> {
    /// Create a cache rooted at `cwd` using directive scanning.
    ///
    /// The unit path defaults to `["."]` and extensions to `["js"]`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_scanner(cwd, DirectiveScanner)
    }
}

impl<S: DeclarationScanner> UnitCache<S> {
    /// Create a cache with a custom scanner.
    pub fn with_scanner(cwd: impl Into<PathBuf>, scanner: S) -> Self {
        Self {
            cwd: cwd.into(),
            unit_path: vec![PathBuf::from(".")],
            extensions: vec!["js".to_string()],
            scanner,
            records: Vec::new(),
            by_file: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Replace the unit path.
    pub fn unit_path<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.unit_path = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the file extensions tried for unit lookup.
    pub fn extensions<I, E>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// The working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Candidate files for unit `name`, in search order.
    pub fn candidates(&self, name: &UnitName) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(self.unit_path.len() * self.extensions.len());
        for dir in &self.unit_path {
            let mut stem = dir.clone();
            stem.extend(name.segments());
            for ext in &self.extensions {
                candidates.push(stem.with_extension(ext));
            }
        }
        candidates
    }

    /// Read and scan `path`, or return the id it was loaded under before.
    ///
    /// With `expected`, the file must declare that unit.
    fn load(&mut self, path: &Path, expected: Option<&UnitName>) -> Result<UnitId, BuildError> {
        let full = self.cwd.join(path);
        let io_error = |source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mismatch = |expected: &UnitName, found: &UnitName| BuildError::NameMismatch {
            path: path.to_path_buf(),
            expected: expected.clone(),
            found: found.clone(),
        };
        let key = fs::canonicalize(&full).map_err(io_error)?;

        if let Some(&id) = self.by_file.get(&key) {
            let found = &self.records[id.0].name;
            return match expected {
                Some(expected) if expected != found => Err(mismatch(expected, found)),
                _ => Ok(id),
            };
        }

        let text = fs::read_to_string(&full).map_err(io_error)?;
        let scanned = self
            .scanner
            .scan(&text)
            .map_err(|source| BuildError::Scan {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(expected) = expected.filter(|e| **e != scanned.name) {
            return Err(mismatch(expected, &scanned.name));
        }
        if let Some(&other) = self.by_name.get(&scanned.name) {
            return Err(BuildError::DuplicateUnit {
                name: scanned.name,
                first: self.records[other.0].file.clone(),
                second: path.to_path_buf(),
            });
        }

        let id = UnitId(self.records.len());
        tracing::debug!(
            unit = %scanned.name,
            file = %path.display(),
            requires = scanned.dependencies.len(),
            "loaded unit"
        );
        self.by_file.insert(key, id);
        self.by_name.insert(scanned.name.clone(), id);
        self.records.push(UnitRecord {
            name: scanned.name,
            file: path.to_path_buf(),
            dependencies: scanned.dependencies,
        });
        Ok(id)
    }
}

impl<S: DeclarationScanner> UnitSource for UnitCache<S> {
    fn read_file(&mut self, path: &Path) -> Result<UnitId, BuildError> {
        self.load(path, None)
    }

    fn read_unit(&mut self, name: &UnitName) -> Result<UnitId, BuildError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }

        let tried = self.candidates(name);
        let found = tried.iter().find(|c| self.cwd.join(c).is_file()).cloned();
        match found {
            Some(path) => self.load(&path, Some(name)),
            None => Err(BuildError::UnitNotFound {
                name: name.clone(),
                tried,
            }),
        }
    }

    fn record(&self, id: UnitId) -> &UnitRecord {
        &self.records[id.0]
    }
}
