//! namespace::tree
//!
//! Placement of unit values into the nested output tree.
//!
//! A unit named `a.b.c` lives at `units["a"]["b"]["c"]`. Intermediate
//! segments are created as empty objects on demand. A JSON object is a
//! container; any other value is a leaf and cannot have units below it.

use serde_json::{Map, Value};

use super::declaration::Units;
use super::error::NamespaceError;
use crate::core::types::UnitName;

/// Walk to the container that holds the last segment of `name`.
///
/// Returns the container and the last segment.
fn parent_of<'t, 'n>(
    tree: &'t mut Units,
    name: &'n UnitName,
) -> Result<(&'t mut Units, &'n str), NamespaceError> {
    let (parents, last) = match name.as_str().rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, name.as_str()),
    };

    let mut current = tree;
    if let Some(parents) = parents {
        let mut walked = 0;
        for segment in parents.split('.') {
            walked += segment.len() + 1;
            current = match current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()))
            {
                Value::Object(map) => map,
                _ => {
                    return Err(NamespaceError::PathCollision {
                        unit: name.clone(),
                        path: parents[..walked - 1].to_string(),
                    })
                }
            };
        }
    }
    Ok((current, last))
}

/// Get or create the container node at `name`.
///
/// This is the augmenting form of [`place`]: re-entering an existing
/// container is allowed, landing on a leaf is not.
///
/// # Errors
///
/// Returns `NamespaceError::PathCollision` if `name` or one of its parents
/// already holds a non-container value.
pub fn node<'t>(tree: &'t mut Units, name: &UnitName) -> Result<&'t mut Units, NamespaceError> {
    let (parent, last) = parent_of(tree, name)?;
    match parent
        .entry(last.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(map) => Ok(map),
        _ => Err(NamespaceError::PathCollision {
            unit: name.clone(),
            path: name.to_string(),
        }),
    }
}

/// Write a unit value at `name`.
///
/// With `None`, behaves like [`node`]: an empty object is created if the
/// path is free and an existing container is left as is. With `Some`, the
/// path must be free.
///
/// # Errors
///
/// Returns `NamespaceError::PathCollision` if a value already exists at
/// `name` (and the write is not a `None` over a container), or if a parent
/// segment holds a non-container value.
///
/// # Example
///
/// ```
/// use gumup::core::types::UnitName;
/// use gumup::namespace::tree::{lookup, place};
/// use gumup::namespace::Units;
/// use serde_json::json;
///
/// let mut units = Units::new();
/// place(&mut units, &UnitName::new("a").unwrap(), None).unwrap();
/// place(&mut units, &UnitName::new("a.b").unwrap(), Some(json!(1))).unwrap();
/// assert_eq!(lookup(&units, "a.b"), Some(&json!(1)));
///
/// // `a.b` is a leaf now
/// assert!(place(&mut units, &UnitName::new("a.b.c").unwrap(), None).is_err());
/// ```
pub fn place(
    tree: &mut Units,
    name: &UnitName,
    value: Option<Value>,
) -> Result<(), NamespaceError> {
    let Some(value) = value else {
        return node(tree, name).map(|_| ());
    };

    let (parent, last) = parent_of(tree, name)?;
    if parent.contains_key(last) {
        return Err(NamespaceError::PathCollision {
            unit: name.clone(),
            path: name.to_string(),
        });
    }
    parent.insert(last.to_string(), value);
    Ok(())
}

/// Look up a value by dotted path.
pub fn lookup<'t>(tree: &'t Units, path: &str) -> Option<&'t Value> {
    let mut segments = path.split('.');
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
