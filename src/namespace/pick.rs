//! namespace::pick
//!
//! Copying declarations between namespaces.
//!
//! # Operations
//!
//! - **pick**: copy units matched by requirement names, together with
//!   everything they transitively require, from a source namespace
//! - **inject**: add single entries, either a source unit under a new name
//!   or a literal value wrapped as a factory
//!
//! Both operations stage their copies first and only touch the destination
//! once every entry has been validated, so a failed call leaves it as it was.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::declaration::{Declaration, DeclarationTable, Implementation};
use super::error::NamespaceError;
use super::Namespace;
use crate::core::graph;
use crate::core::types::{RequireName, UnitName};

/// One injected entry.
///
/// Exactly one of `unit` and `value` must be set.
///
/// # Example
///
/// ```
/// use gumup::namespace::Injection;
///
/// let entries: Vec<Injection> = serde_json::from_str(r#"[
///     {"name": "config.port", "value": 8080},
///     {"name": "db", "unit": "storage.postgres"}
/// ]"#).unwrap();
/// assert_eq!(entries[1], Injection::from_unit("db", "storage.postgres"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Injection {
    /// Name the entry is declared under in the destination
    pub name: String,

    /// Source unit to copy (without its dependencies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Literal value to declare as a zero-dependency factory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Injection {
    /// Copy source unit `unit` in as `name`.
    pub fn from_unit(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: Some(unit.into()),
            value: None,
        }
    }

    /// Declare `value` as `name`.
    pub fn from_value(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            value: Some(value.into()),
        }
    }
}

/// Settings for [`Namespace::pick`].
#[derive(Debug, Clone, Default)]
pub struct PickSettings<'a> {
    /// Namespace to copy from
    pub namespace: Option<&'a Namespace>,
    /// Requirement names of the units to copy
    pub units: Vec<String>,
    /// Entries to inject
    pub injections: Vec<Injection>,
}

impl<'a> PickSettings<'a> {
    /// Empty settings with no source namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings copying from `namespace`.
    pub fn with_source(namespace: &'a Namespace) -> Self {
        Self {
            namespace: Some(namespace),
            ..Self::default()
        }
    }

    /// Add one requirement name to copy.
    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.units.push(name.into());
        self
    }

    /// Add several requirement names to copy.
    pub fn units<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.units.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add an injection.
    pub fn inject(mut self, injection: Injection) -> Self {
        self.injections.push(injection);
        self
    }
}

/// Stage every copy named by `settings` and commit them to `dest`.
pub(crate) fn pick(
    dest: &mut DeclarationTable,
    settings: &PickSettings<'_>,
) -> Result<(), NamespaceError> {
    let source = settings.namespace.map(|ns| &ns.table);
    let mut staged = Staging::default();

    if !settings.units.is_empty() {
        let source = source.ok_or(NamespaceError::MissingSource)?;
        let mut copier = Copier {
            source,
            staged: &mut staged,
            stack: IndexSet::new(),
        };
        for name in &settings.units {
            copier.pick(name)?;
        }
    }

    for injection in &settings.injections {
        let (name, declaration) = stage_injection(source, injection)?;
        staged.add(name, declaration)?;
    }

    staged.commit(dest)
}

/// Copies waiting to be committed, in pick order.
#[derive(Default)]
struct Staging {
    entries: IndexMap<UnitName, Rc<Declaration>>,
}

impl Staging {
    fn add(&mut self, name: UnitName, declaration: Rc<Declaration>) -> Result<(), NamespaceError> {
        if self.entries.contains_key(&name) {
            return Err(NamespaceError::DuplicateUnit(name));
        }
        self.entries.insert(name, declaration);
        Ok(())
    }

    fn commit(self, dest: &mut DeclarationTable) -> Result<(), NamespaceError> {
        for name in self.entries.keys() {
            dest.check_shared(name)?;
        }
        let count = self.entries.len();
        for (name, declaration) in self.entries {
            dest.insert_shared(name, declaration)?;
        }
        tracing::debug!(units = count, "picked declarations");
        Ok(())
    }
}

struct Copier<'a> {
    source: &'a DeclarationTable,
    staged: &'a mut Staging,
    /// Units in progress on the active copy path
    stack: IndexSet<UnitName>,
}

impl Copier<'_> {
    /// Copy everything a top-level requirement name matches.
    fn pick(&mut self, name: &str) -> Result<(), NamespaceError> {
        let requirement = RequireName::new(name)?;
        let matched = match graph::expand(self.source, &requirement, None) {
            Ok(matched) => matched,
            Err(_) => return Err(NamespaceError::UnknownUnit(name.to_string())),
        };
        tracing::trace!(requirement = name, matched = matched.len(), "picking units");
        for unit in &matched {
            self.copy(unit)?;
        }
        Ok(())
    }

    /// Copy one unit after its transitive dependencies.
    fn copy(&mut self, name: &UnitName) -> Result<(), NamespaceError> {
        if self.staged.entries.contains_key(name) {
            return Ok(());
        }
        if !self.stack.insert(name.clone()) {
            let mut stack: Vec<UnitName> = self.stack.iter().cloned().collect();
            stack.push(name.clone());
            return Err(NamespaceError::RecursiveDependency {
                unit: name.clone(),
                stack,
            });
        }

        let declaration = self
            .source
            .get(name.as_str())
            .ok_or_else(|| NamespaceError::UnknownUnit(name.to_string()))?
            .clone();
        for requirement in declaration.dependencies() {
            for dep in graph::expand(self.source, requirement, Some(name))? {
                self.copy(&dep)?;
            }
        }

        self.stack.pop();
        self.staged.add(name.clone(), declaration)
    }
}

fn stage_injection(
    source: Option<&DeclarationTable>,
    injection: &Injection,
) -> Result<(UnitName, Rc<Declaration>), NamespaceError> {
    let name = UnitName::new(injection.name.as_str())?;
    let invalid = |reason: &'static str| NamespaceError::InvalidInjection {
        name: injection.name.clone(),
        reason,
    };

    match (&injection.unit, &injection.value) {
        (Some(unit), None) => {
            let source = source.ok_or(NamespaceError::MissingSource)?;
            let unit = UnitName::new(unit.as_str())?;
            let declaration = source
                .get(unit.as_str())
                .ok_or_else(|| NamespaceError::UnknownUnit(unit.to_string()))?;
            Ok((name, declaration.clone()))
        }
        (None, Some(value)) => {
            let declaration = Declaration::new(Implementation::value(value.clone()));
            Ok((name, Rc::new(declaration)))
        }
        (Some(_), Some(_)) => Err(invalid("both `unit` and `value` are set")),
        (None, None) => Err(invalid("one of `unit` or `value` must be set")),
    }
}
