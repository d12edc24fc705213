//! Property-based tests for names and dependency ordering.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;

use gumup::core::types::{is_require_name, is_unit_name, RequireName, UnitName};
use gumup::namespace::{Namespace, NamespaceError};

/// Strategy for one identifier segment.
fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z_$][A-Za-z0-9_$]{0,8}"
}

/// Strategy for valid dotted unit names.
fn valid_unit_name() -> impl Strategy<Value = String> {
    prop::collection::vec(ident(), 1..5).prop_map(|segments| segments.join("."))
}

/// Strategy for arbitrary short strings over the name alphabet and some noise.
fn noisy_name() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::char::range('a', 'c'),
            prop::char::range('0', '2'),
            Just('.'),
            Just('*'),
            Just('_'),
            Just('$'),
            Just('-'),
            Just(' '),
        ],
        0..12,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for a DAG over `n` units: unit `i` may require any `j < i`.
fn dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|n| {
        (0..n)
            .map(|i| prop::sample::subsequence((0..i).collect::<Vec<_>>(), 0..=i))
            .collect::<Vec<_>>()
    })
}

/// Declare units `u0..un` in `order` with the given edges, recording runs.
fn declare(
    edges: &[Vec<usize>],
    order: &[usize],
    log: &Rc<RefCell<Vec<usize>>>,
) -> Namespace {
    let mut ns = Namespace::new();
    for &i in order {
        let log = Rc::clone(log);
        let mut handle = ns
            .unit(&format!("u{i}"), move |_, _| {
                log.borrow_mut().push(i);
                Ok(())
            })
            .unwrap();
        for &dep in &edges[i] {
            handle = handle.require(&format!("u{dep}")).unwrap();
        }
    }
    ns
}

proptest! {
    /// Generated unit names are accepted by both predicates and the type.
    #[test]
    fn valid_names_accepted(name in valid_unit_name()) {
        prop_assert!(is_unit_name(&name));
        prop_assert!(is_require_name(&name));
        let pattern = format!("{}.*", name);
        prop_assert!(is_require_name(&pattern));
        prop_assert!(UnitName::new(&name).is_ok());
    }

    /// The predicates and the typed constructors never disagree.
    #[test]
    fn predicates_match_constructors(s in noisy_name()) {
        prop_assert_eq!(is_unit_name(&s), UnitName::new(&s).is_ok());
        prop_assert_eq!(is_require_name(&s), RequireName::new(&s).is_ok());
        // every unit name is a require name
        prop_assert!(!is_unit_name(&s) || is_require_name(&s));
    }

    /// Names with an empty segment are never valid.
    #[test]
    fn empty_segments_rejected(name in valid_unit_name()) {
        let leading = format!(".{}", name);
        let trailing = format!("{}.", name);
        let doubled = name.replacen('.', "..", 1);
        prop_assert!(!is_unit_name(&leading));
        prop_assert!(!is_unit_name(&trailing));
        if name.contains('.') {
            prop_assert!(!is_require_name(&doubled));
        }
    }

    /// Every unit of a DAG runs exactly once, after all its dependencies,
    /// whatever order the units were declared in.
    #[test]
    fn dag_initializes_in_dependency_order(
        (edges, order) in dag().prop_flat_map(|edges| {
            let n = edges.len();
            (Just(edges), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        })
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ns = declare(&edges, &order, &log);
        ns.init().unwrap();

        let ran = log.borrow();
        prop_assert_eq!(ran.len(), edges.len());
        let position: HashMap<usize, usize> =
            ran.iter().enumerate().map(|(pos, &unit)| (unit, pos)).collect();
        prop_assert_eq!(position.len(), edges.len());
        for (unit, deps) in edges.iter().enumerate() {
            for dep in deps {
                prop_assert!(position[dep] < position[&unit]);
            }
        }
    }

    /// Closing any DAG path into a cycle fails before a single unit runs.
    #[test]
    fn cycles_fail_before_any_unit_runs(edges in dag(), back in any::<prop::sample::Index>()) {
        let mut edges = edges;
        let n = edges.len();
        // add a back edge from the first unit to some unit, possibly itself,
        // that reaches it
        let target = back.index(n);
        let path = path_to_zero(&edges, target);
        prop_assume!(path.is_some());
        edges[0].push(target);

        let log = Rc::new(RefCell::new(Vec::new()));
        let order: Vec<usize> = (0..n).collect();
        let mut ns = declare(&edges, &order, &log);

        let result = ns.init();
        let is_cycle = matches!(result, Err(NamespaceError::RecursiveDependency { .. }));
        prop_assert!(is_cycle);
        prop_assert!(log.borrow().is_empty());
    }
}

/// Whether `from` reaches unit 0 along dependency edges.
fn path_to_zero(edges: &[Vec<usize>], from: usize) -> Option<()> {
    if from == 0 {
        return Some(());
    }
    edges[from].iter().find_map(|&dep| path_to_zero(edges, dep))
}
