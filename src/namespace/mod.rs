//! namespace
//!
//! The live unit registry.
//!
//! # Lifecycle
//!
//! A [`Namespace`] starts **open**: units are declared with [`Namespace::unit`]
//! or [`Namespace::object`], given requirements through the returned
//! [`UnitHandle`], or copied in from another namespace with
//! [`Namespace::pick`]. Calling [`Namespace::init`] **seals** it for good:
//! every requirement is expanded against the table as it stands, the graph
//! is checked for cycles, and each unit runs once, after its dependencies.
//! Every mutating call on a sealed namespace fails with
//! `NamespaceError::NamespaceSealed`.
//!
//! # Example
//!
//! ```
//! use gumup::namespace::Namespace;
//! use serde_json::json;
//!
//! let mut ns = Namespace::new();
//! ns.object("config.port", |_| Ok(Some(json!(8080)))).unwrap();
//! ns.unit("server", |this, units| {
//!     let port = units["config"]["port"].clone();
//!     this.insert("listening".into(), port);
//!     Ok(())
//! })
//! .unwrap()
//! .require("config.*")
//! .unwrap();
//!
//! ns.init().unwrap();
//! assert_eq!(ns.get("server.listening"), Some(&json!(8080)));
//! ```

mod declaration;
mod error;
mod init;
mod pick;
pub mod tree;

pub use declaration::{Declaration, DeclarationTable, Implementation, Shape, Units};
pub use error::NamespaceError;
pub use pick::{Injection, PickSettings};

use serde_json::Value;

use crate::core::graph::{self, ResolvedGraph};
use crate::core::types::{RequireName, UnitName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Open,
    Sealed,
}

/// A declaration table plus the unit tree it initializes into.
#[derive(Debug, Default)]
pub struct Namespace {
    table: DeclarationTable,
    units: Units,
    state: State,
}

impl Namespace {
    /// Create an empty, open namespace.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), NamespaceError> {
        match self.state {
            State::Open => Ok(()),
            State::Sealed => Err(NamespaceError::NamespaceSealed),
        }
    }

    /// Declare an augmenting unit.
    ///
    /// `f` receives the unit's own node and the whole unit tree.
    pub fn unit<F>(&mut self, name: &str, f: F) -> Result<UnitHandle<'_>, NamespaceError>
    where
        F: Fn(&mut Units, &Units) -> anyhow::Result<()> + 'static,
    {
        self.declare(name, Implementation::augment(f))
    }

    /// Declare a factory unit.
    ///
    /// `f` receives the whole unit tree and returns the unit's value.
    pub fn object<F>(&mut self, name: &str, f: F) -> Result<UnitHandle<'_>, NamespaceError>
    where
        F: Fn(&Units) -> anyhow::Result<Option<Value>> + 'static,
    {
        self.declare(name, Implementation::factory(f))
    }

    /// Declare a unit with any implementation.
    ///
    /// # Errors
    ///
    /// - `NamespaceError::NamespaceSealed` after [`Namespace::init`]
    /// - `NamespaceError::InvalidName` if `name` is not a unit name
    /// - `NamespaceError::DuplicateUnit` if `name` is already declared
    pub fn declare(
        &mut self,
        name: &str,
        implementation: Implementation,
    ) -> Result<UnitHandle<'_>, NamespaceError> {
        self.ensure_open()?;
        let name = UnitName::new(name)?;
        tracing::debug!(unit = %name, shape = ?implementation.shape(), "declaring unit");
        self.table.declare(name.clone(), implementation)?;
        Ok(UnitHandle {
            namespace: self,
            name,
        })
    }

    /// Add a requirement to a declared unit.
    ///
    /// # Errors
    ///
    /// - `NamespaceError::NamespaceSealed` after [`Namespace::init`]
    /// - `NamespaceError::InvalidRequireName` if `requirement` is malformed
    /// - `NamespaceError::UnknownUnit` if `unit` is not declared here
    pub fn require(&mut self, unit: &str, requirement: &str) -> Result<(), NamespaceError> {
        self.ensure_open()?;
        let requirement = RequireName::new(requirement)?;
        self.table.require(unit, requirement)
    }

    /// Expand every requirement and check the graph, without initializing.
    pub fn resolve(&self) -> Result<ResolvedGraph, NamespaceError> {
        Ok(graph::resolve(&self.table)?)
    }

    /// Seal the namespace and initialize every unit.
    ///
    /// The namespace is sealed before anything else happens, so it stays
    /// sealed if resolution or a unit fails.
    ///
    /// # Errors
    ///
    /// - `NamespaceError::NamespaceSealed` on a second call
    /// - `NamespaceError::UnresolvableDependency` or
    ///   `NamespaceError::RecursiveDependency` from resolution, before any
    ///   unit runs
    /// - `NamespaceError::PathCollision` if a unit cannot be placed
    /// - `NamespaceError::UnitFailed` if an implementation returns an error
    pub fn init(&mut self) -> Result<(), NamespaceError> {
        self.ensure_open()?;
        self.state = State::Sealed;

        let graph = self.resolve()?;
        tracing::debug!(
            units = graph.len(),
            roots = graph.roots().len(),
            "resolved namespace"
        );
        init::initialize(&graph, &self.table, &mut self.units)
    }

    /// Copy units and injections into this namespace.
    ///
    /// Either every entry is copied or, on error, none is.
    ///
    /// # Errors
    ///
    /// - `NamespaceError::NamespaceSealed` after [`Namespace::init`]
    /// - `NamespaceError::MissingSource` if units are named without a source
    /// - `NamespaceError::UnknownUnit` if a named unit matches nothing
    /// - `NamespaceError::RecursiveDependency` if the copied closure has a cycle
    /// - `NamespaceError::DuplicateUnit` if a copied name is already taken
    /// - `NamespaceError::InvalidInjection` for a malformed injection
    ///
    /// # Example
    ///
    /// ```
    /// use gumup::namespace::{Namespace, PickSettings};
    /// use serde_json::json;
    ///
    /// let mut lib = Namespace::new();
    /// lib.object("a", |_| Ok(Some(json!(1)))).unwrap();
    /// lib.object("b", |_| Ok(Some(json!(2)))).unwrap().require("a").unwrap();
    /// lib.object("c", |_| Ok(Some(json!(3)))).unwrap();
    ///
    /// let mut app = Namespace::new();
    /// app.pick(&PickSettings::with_source(&lib).unit("b")).unwrap();
    /// app.init().unwrap();
    /// assert_eq!(app.get("a"), Some(&json!(1)));
    /// assert_eq!(app.get("c"), None);
    /// ```
    pub fn pick(&mut self, settings: &PickSettings<'_>) -> Result<&mut Self, NamespaceError> {
        self.ensure_open()?;
        pick::pick(&mut self.table, settings)?;
        Ok(self)
    }

    /// Add injections only.
    ///
    /// `source` is needed for injections that copy a unit.
    pub fn inject(
        &mut self,
        source: Option<&Namespace>,
        injections: &[Injection],
    ) -> Result<&mut Self, NamespaceError> {
        let settings = PickSettings {
            namespace: source,
            units: Vec::new(),
            injections: injections.to_vec(),
        };
        self.pick(&settings)
    }

    /// The unit tree. Empty until [`Namespace::init`] has run.
    pub fn units(&self) -> &Units {
        &self.units
    }

    /// Look up an initialized unit by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        tree::lookup(&self.units, path)
    }

    /// Whether [`Namespace::init`] has been called.
    pub fn is_sealed(&self) -> bool {
        self.state == State::Sealed
    }

    /// Declared unit names, in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = &UnitName> {
        self.table.names()
    }

    /// Raw requirements of a declared unit.
    pub fn dependencies(&self, name: &str) -> Option<&[RequireName]> {
        self.table.get(name).map(|d| d.dependencies())
    }

    /// The underlying declaration table.
    pub fn declarations(&self) -> &DeclarationTable {
        &self.table
    }
}

/// Handle to a freshly declared unit, for chaining requirements.
#[derive(Debug)]
pub struct UnitHandle<'a> {
    namespace: &'a mut Namespace,
    name: UnitName,
}

impl UnitHandle<'_> {
    /// Add a requirement to this unit.
    ///
    /// # Errors
    ///
    /// Same as [`Namespace::require`].
    pub fn require(self, requirement: &str) -> Result<Self, NamespaceError> {
        self.namespace.require(self.name.as_str(), requirement)?;
        Ok(self)
    }

    /// The declared name.
    pub fn name(&self) -> &UnitName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging(ns: &mut Namespace, log: &Log, name: &str, requires: &[&str]) {
        let log = Rc::clone(log);
        let label = name.to_string();
        let mut handle = ns
            .unit(name, move |_, _| {
                log.borrow_mut().push(label.clone());
                Ok(())
            })
            .unwrap();
        for req in requires {
            handle = handle.require(req).unwrap();
        }
    }

    fn ran(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn declare_validates_names() {
        let mut ns = Namespace::new();
        assert!(matches!(
            ns.unit("1a", |_, _| Ok(())),
            Err(NamespaceError::InvalidName(_))
        ));
        assert!(matches!(
            ns.unit("a.*", |_, _| Ok(())),
            Err(NamespaceError::InvalidName(_))
        ));
        assert_eq!(ns.declared().count(), 0);
    }

    #[test]
    fn handle_validates_require_names() {
        let mut ns = Namespace::new();
        let err = ns
            .unit("a", |_, _| Ok(()))
            .unwrap()
            .require("b.")
            .unwrap_err();
        assert!(matches!(err, NamespaceError::InvalidRequireName(ref n) if n == "b."));
        assert_eq!(ns.dependencies("a"), Some(&[][..]));
    }

    #[test]
    fn require_by_name_needs_declared_unit() {
        let mut ns = Namespace::new();
        assert!(matches!(
            ns.require("ghost", "a"),
            Err(NamespaceError::UnknownUnit(_))
        ));
    }

    #[test]
    fn init_orders_dependencies_first() {
        let log = Log::default();
        let mut ns = Namespace::new();
        logging(&mut ns, &log, "a", &[]);
        logging(&mut ns, &log, "b", &["a"]);
        logging(&mut ns, &log, "c", &["b"]);
        logging(&mut ns, &log, "d", &["a", "c", "b"]);

        ns.init().unwrap();
        assert_eq!(ran(&log), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let log = Log::default();
        let mut ns = Namespace::new();
        logging(&mut ns, &log, "app", &["db", "log"]);
        logging(&mut ns, &log, "db", &["log"]);
        logging(&mut ns, &log, "log", &[]);

        ns.init().unwrap();
        assert_eq!(ran(&log), vec!["log", "db", "app"]);
    }

    #[test]
    fn unrequired_units_still_run() {
        let log = Log::default();
        let mut ns = Namespace::new();
        logging(&mut ns, &log, "x", &[]);
        logging(&mut ns, &log, "y", &[]);

        ns.init().unwrap();
        assert_eq!(ran(&log), vec!["x", "y"]);
    }

    #[test]
    fn cycle_fails_before_any_unit_runs() {
        let log = Log::default();
        let mut ns = Namespace::new();
        logging(&mut ns, &log, "free", &[]);
        logging(&mut ns, &log, "a", &["b"]);
        logging(&mut ns, &log, "b", &["a"]);

        let err = ns.init().unwrap_err();
        assert!(matches!(err, NamespaceError::RecursiveDependency { .. }));
        assert!(ran(&log).is_empty());
        assert!(ns.is_sealed());
    }

    #[test]
    fn missing_dependency_fails_at_init() {
        let mut ns = Namespace::new();
        ns.unit("a", |_, _| Ok(())).unwrap().require("nope").unwrap();
        let err = ns.init().unwrap_err();
        assert_eq!(err.to_string(), "invalid dependency 'nope' required by 'a'");
    }

    #[test]
    fn sealed_namespace_rejects_mutation() {
        let mut ns = Namespace::new();
        ns.unit("a", |_, _| Ok(())).unwrap();
        ns.init().unwrap();

        assert!(matches!(
            ns.unit("b", |_, _| Ok(())),
            Err(NamespaceError::NamespaceSealed)
        ));
        assert!(matches!(
            ns.require("a", "b"),
            Err(NamespaceError::NamespaceSealed)
        ));
        assert!(matches!(ns.init(), Err(NamespaceError::NamespaceSealed)));
        assert!(matches!(
            ns.inject(None, &[Injection::from_value("v", 1)]),
            Err(NamespaceError::NamespaceSealed)
        ));
    }

    #[test]
    fn augmenting_and_factory_values_land_in_tree() {
        let mut ns = Namespace::new();
        ns.unit("a", |this, _| {
            this.insert("x".into(), json!(42));
            Ok(())
        })
        .unwrap();
        ns.object("a.b", |units| Ok(Some(json!(units["a"]["x"].clone()))))
            .unwrap()
            .require("a")
            .unwrap();
        ns.object("empty", |_| Ok(None)).unwrap();

        ns.init().unwrap();
        assert_eq!(
            Value::Object(ns.units().clone()),
            json!({"a": {"x": 42, "b": 42}, "empty": {}})
        );
    }

    #[test]
    fn augmenting_unit_sees_its_own_subunits() {
        let mut ns = Namespace::new();
        ns.object("a.b", |_| Ok(Some(json!("inner")))).unwrap();
        ns.unit("a", |this, units| {
            assert!(units.get("a").map_or(true, Value::is_object));
            let inner = this.get("b").cloned().unwrap_or(Value::Null);
            this.insert("seen".into(), inner);
            Ok(())
        })
        .unwrap()
        .require("a.*")
        .unwrap();

        ns.init().unwrap();
        assert_eq!(ns.get("a.seen"), Some(&json!("inner")));
    }

    #[test]
    fn unit_error_is_wrapped() {
        let mut ns = Namespace::new();
        ns.object("broken", |_| Err(anyhow::anyhow!("boom"))).unwrap();
        let err = ns.init().unwrap_err();
        assert!(matches!(err, NamespaceError::UnitFailed { ref unit, .. } if unit.as_str() == "broken"));
    }

    #[test]
    fn star_sees_units_declared_later() {
        let log = Log::default();
        let mut ns = Namespace::new();
        logging(&mut ns, &log, "main", &["*"]);
        logging(&mut ns, &log, "late1", &[]);
        logging(&mut ns, &log, "late2", &[]);

        ns.init().unwrap();
        assert_eq!(ran(&log), vec!["late1", "late2", "main"]);
    }

    #[test]
    fn pick_without_source_fails() {
        let mut ns = Namespace::new();
        let err = ns.pick(&PickSettings::new().unit("a")).unwrap_err();
        assert!(matches!(err, NamespaceError::MissingSource));
    }

    #[test]
    fn pick_copies_closure_only() {
        let mut source = Namespace::new();
        source.object("a", |_| Ok(Some(json!("A")))).unwrap();
        source
            .object("b", |_| Ok(Some(json!("B"))))
            .unwrap()
            .require("a")
            .unwrap();
        source.object("c", |_| Ok(Some(json!("C")))).unwrap();

        let mut dest = Namespace::new();
        dest.pick(&PickSettings::with_source(&source).unit("b"))
            .unwrap();
        let names: Vec<_> = dest.declared().map(UnitName::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn pick_unknown_unit_fails() {
        let source = Namespace::new();
        let mut dest = Namespace::new();
        let err = dest
            .pick(&PickSettings::with_source(&source).unit("ghost"))
            .unwrap_err();
        assert!(matches!(err, NamespaceError::UnknownUnit(ref n) if n == "ghost"));
    }

    #[test]
    fn pick_is_atomic() {
        let mut source = Namespace::new();
        source.object("a", |_| Ok(None)).unwrap();
        source.object("b", |_| Ok(None)).unwrap();

        let mut dest = Namespace::new();
        dest.object("b", |_| Ok(None)).unwrap();

        let err = dest
            .pick(&PickSettings::with_source(&source).units(["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, NamespaceError::DuplicateUnit(ref n) if n.as_str() == "b"));
        assert!(dest.declarations().get("a").is_none());
    }

    #[test]
    fn picking_an_already_copied_unit_fails() {
        let mut source = Namespace::new();
        source.object("a", |_| Ok(None)).unwrap();
        source.object("b", |_| Ok(None)).unwrap().require("a").unwrap();

        let mut dest = Namespace::new();
        dest.pick(&PickSettings::with_source(&source).unit("a"))
            .unwrap();
        let err = dest
            .pick(&PickSettings::with_source(&source).unit("a"))
            .unwrap_err();
        assert!(matches!(err, NamespaceError::DuplicateUnit(ref n) if n.as_str() == "a"));

        // the closure of b includes a, which is already declared here
        let err = dest
            .pick(&PickSettings::with_source(&source).unit("b"))
            .unwrap_err();
        assert!(matches!(err, NamespaceError::DuplicateUnit(ref n) if n.as_str() == "a"));
        assert!(dest.declarations().get("b").is_none());
    }

    #[test]
    fn shared_dependency_is_copied_once_per_pick() {
        let mut source = Namespace::new();
        source.object("base", |_| Ok(None)).unwrap();
        source.object("x", |_| Ok(None)).unwrap().require("base").unwrap();
        source.object("y", |_| Ok(None)).unwrap().require("base").unwrap();

        let mut dest = Namespace::new();
        dest.pick(&PickSettings::with_source(&source).units(["x", "y", "x"]))
            .unwrap();
        assert_eq!(dest.declared().count(), 3);
    }

    #[test]
    fn pick_reports_cycles_in_source() {
        let mut source = Namespace::new();
        source.unit("a", |_, _| Ok(())).unwrap().require("b").unwrap();
        source.unit("b", |_, _| Ok(())).unwrap().require("a").unwrap();

        let mut dest = Namespace::new();
        let err = dest
            .pick(&PickSettings::with_source(&source).unit("a"))
            .unwrap_err();
        assert_eq!(err.to_string(), "recursive dependency 'a' (a -> b -> a)");
    }

    #[test]
    fn inject_values_and_renamed_units() {
        let mut source = Namespace::new();
        source
            .object("storage.memory", |_| Ok(Some(json!("mem"))))
            .unwrap();

        let mut dest = Namespace::new();
        dest.inject(
            Some(&source),
            &[
                Injection::from_value("config.port", 8080),
                Injection::from_unit("db", "storage.memory"),
            ],
        )
        .unwrap();
        dest.init().unwrap();

        assert_eq!(dest.get("config.port"), Some(&json!(8080)));
        assert_eq!(dest.get("db"), Some(&json!("mem")));
        assert_eq!(dest.get("storage"), None);
    }

    #[test]
    fn inject_rejects_ambiguous_entries() {
        let mut ns = Namespace::new();
        let both = Injection {
            name: "x".into(),
            unit: Some("a".into()),
            value: Some(json!(1)),
        };
        let neither = Injection {
            name: "y".into(),
            unit: None,
            value: None,
        };
        for entry in [both, neither] {
            assert!(matches!(
                ns.inject(None, &[entry]),
                Err(NamespaceError::InvalidInjection { .. })
            ));
        }
    }

    #[test]
    fn inject_unit_needs_source() {
        let mut ns = Namespace::new();
        assert!(matches!(
            ns.inject(None, &[Injection::from_unit("db", "storage")]),
            Err(NamespaceError::MissingSource)
        ));
    }

    #[test]
    fn requirements_added_after_pick_stay_local() {
        let mut source = Namespace::new();
        source.object("a", |_| Ok(None)).unwrap();
        source.object("b", |_| Ok(None)).unwrap();

        let mut dest = Namespace::new();
        dest.pick(&PickSettings::with_source(&source).unit("a"))
            .unwrap();
        dest.object("c", |_| Ok(None)).unwrap();
        dest.require("a", "c").unwrap();

        assert_eq!(source.dependencies("a"), Some(&[][..]));
        assert_eq!(dest.dependencies("a").map(<[_]>::len), Some(1));
    }
}
