//! namespace::declaration
//!
//! Unit declarations and the insertion-ordered table that holds them.
//!
//! # Sharing
//!
//! Declarations are stored behind `Rc` so `pick` and `inject` can copy them
//! between namespaces without cloning the implementation. Adding a
//! requirement to a shared declaration clones it first, so a copy never
//! changes under the namespace that received it.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::error::NamespaceError;
use crate::core::graph::DependencySource;
use crate::core::types::{RequireName, UnitName};

/// The output tree of a namespace, and the node an augmenting unit receives.
pub type Units = Map<String, Value>;

type AugmentFn = dyn Fn(&mut Units, &Units) -> anyhow::Result<()>;
type FactoryFn = dyn Fn(&Units) -> anyhow::Result<Option<Value>>;

/// How a unit's implementation produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Mutates the node at the unit's path; the return value is ignored
    Augmenting,
    /// Returns the value stored at the unit's path
    Factory,
}

/// A deferred unit constructor.
#[derive(Clone)]
pub enum Implementation {
    /// Called with the unit's own node and the whole tree
    Augment(Rc<AugmentFn>),
    /// Called with the whole tree; `None` leaves an empty object behind
    Factory(Rc<FactoryFn>),
}

impl Implementation {
    /// Wrap an augmenting constructor.
    pub fn augment<F>(f: F) -> Self
    where
        F: Fn(&mut Units, &Units) -> anyhow::Result<()> + 'static,
    {
        Implementation::Augment(Rc::new(f))
    }

    /// Wrap a factory constructor.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Units) -> anyhow::Result<Option<Value>> + 'static,
    {
        Implementation::Factory(Rc::new(f))
    }

    /// A factory that always yields a copy of `value`.
    pub fn value(value: Value) -> Self {
        Self::factory(move |_| Ok(Some(value.clone())))
    }

    /// The shape of this implementation.
    pub fn shape(&self) -> Shape {
        match self {
            Implementation::Augment(_) => Shape::Augmenting,
            Implementation::Factory(_) => Shape::Factory,
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Implementation::{:?}", self.shape())
    }
}

/// A registered intent to create a unit.
#[derive(Debug, Clone)]
pub struct Declaration {
    dependencies: Vec<RequireName>,
    implementation: Implementation,
}

impl Declaration {
    /// Create a declaration with no dependencies.
    pub fn new(implementation: Implementation) -> Self {
        Self {
            dependencies: Vec::new(),
            implementation,
        }
    }

    /// Raw requirements, in the order they were added.
    pub fn dependencies(&self) -> &[RequireName] {
        &self.dependencies
    }

    /// The deferred constructor.
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    /// Shortcut for `implementation().shape()`.
    pub fn shape(&self) -> Shape {
        self.implementation.shape()
    }
}

/// Insertion-ordered mapping from unit name to declaration.
#[derive(Debug, Clone, Default)]
pub struct DeclarationTable {
    declarations: IndexMap<UnitName, Rc<Declaration>>,
}

impl DeclarationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fresh declaration.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceError::DuplicateUnit` if `name` is already declared.
    pub fn declare(
        &mut self,
        name: UnitName,
        implementation: Implementation,
    ) -> Result<(), NamespaceError> {
        if self.declarations.contains_key(&name) {
            return Err(NamespaceError::DuplicateUnit(name));
        }
        self.declarations
            .insert(name, Rc::new(Declaration::new(implementation)));
        Ok(())
    }

    /// Check whether a copied declaration may be stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceError::DuplicateUnit` if the name is already
    /// declared, whatever declaration it holds.
    pub fn check_shared(&self, name: &UnitName) -> Result<(), NamespaceError> {
        if self.declarations.contains_key(name) {
            return Err(NamespaceError::DuplicateUnit(name.clone()));
        }
        Ok(())
    }

    /// Store a declaration shared with another table.
    ///
    /// # Errors
    ///
    /// Same as [`DeclarationTable::check_shared`].
    pub fn insert_shared(
        &mut self,
        name: UnitName,
        declaration: Rc<Declaration>,
    ) -> Result<(), NamespaceError> {
        self.check_shared(&name)?;
        self.declarations.insert(name, declaration);
        Ok(())
    }

    /// Append a requirement to a declared unit.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceError::UnknownUnit` if `name` is not declared.
    pub fn require(&mut self, name: &str, requirement: RequireName) -> Result<(), NamespaceError> {
        let declaration = self
            .declarations
            .get_mut(name)
            .ok_or_else(|| NamespaceError::UnknownUnit(name.to_string()))?;
        Rc::make_mut(declaration).dependencies.push(requirement);
        Ok(())
    }

    /// Look up a declaration.
    pub fn get(&self, name: &str) -> Option<&Rc<Declaration>> {
        self.declarations.get(name)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declared names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &UnitName> {
        self.declarations.keys()
    }
}

impl DependencySource for DeclarationTable {
    fn unit_names(&self) -> impl Iterator<Item = &UnitName> {
        self.declarations.keys()
    }

    fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    fn requirements(&self, name: &str) -> &[RequireName] {
        self.declarations
            .get(name)
            .map(|d| d.dependencies())
            .unwrap_or(&[])
    }
}
