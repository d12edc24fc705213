//! core::types
//!
//! Strong types for unit names and requirement names.
//!
//! # Types
//!
//! - [`UnitName`] - Validated dotted unit name (`foo.bar.baz`)
//! - [`RequireName`] - Validated requirement (`foo.bar`, `foo.*` or `*`)
//! - [`Target`] - Classified form of a requirement
//!
//! # Grammar
//!
//! ```text
//! unitName    : IDENT ('.' IDENT)*
//! requireName : unitName ('.' '*')? | '*'
//! IDENT       : [A-Za-z_$] [A-Za-z0-9_$]*
//! ```
//!
//! # Examples
//!
//! ```
//! use gumup::core::types::{is_require_name, is_unit_name, RequireName, Target, UnitName};
//!
//! assert!(is_unit_name("app.models.$user"));
//! assert!(!is_unit_name("app.*"));
//! assert!(is_require_name("app.*"));
//!
//! let req = RequireName::new("app.*").unwrap();
//! assert_eq!(req.target(), Target::Prefix("app."));
//! assert!(UnitName::new("1app").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from name validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid unit name '{0}'")]
    InvalidUnitName(String),

    #[error("invalid require name '{0}'")]
    InvalidRequireName(String),
}

/// Check whether `s` is a valid identifier segment.
fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Check whether `s` matches the unit name grammar.
///
/// Pure predicate; never panics.
pub fn is_unit_name(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_ident)
}

/// Check whether `s` matches the requirement name grammar.
///
/// Accepts every unit name, a unit name followed by `.*`, and the bare `*`.
pub fn is_require_name(s: &str) -> bool {
    if s == "*" {
        return true;
    }
    match s.strip_suffix(".*") {
        Some(base) => is_unit_name(base),
        None => is_unit_name(s),
    }
}

/// A validated unit name.
///
/// Unit names double as dependency graph node ids and as paths into the
/// namespace tree, one segment per `.`.
///
/// # Example
///
/// ```
/// use gumup::core::types::UnitName;
///
/// let name = UnitName::new("app.models.user").unwrap();
/// assert_eq!(name.segments().collect::<Vec<_>>(), vec!["app", "models", "user"]);
///
/// assert!(UnitName::new("").is_err());
/// assert!(UnitName::new("app.").is_err());
/// assert!(UnitName::new("*").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitName(String);

impl UnitName {
    /// Create a new validated unit name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidUnitName` if the name violates the grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if is_unit_name(&name) {
            Ok(Self(name))
        } else {
            Err(TypeError::InvalidUnitName(name))
        }
    }

    /// Get the unit name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl TryFrom<String> for UnitName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for UnitName {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UnitName> for String {
    fn from(name: UnitName) -> Self {
        name.0
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for UnitName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a requirement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// `*` - every declared unit
    All,
    /// `foo.*` - every unit below `foo` (the prefix keeps its trailing `.`)
    Prefix(&'a str),
    /// `foo` - exactly one unit
    Exact(&'a str),
}

/// A validated requirement name.
///
/// # Example
///
/// ```
/// use gumup::core::types::{RequireName, Target};
///
/// assert_eq!(RequireName::new("*").unwrap().target(), Target::All);
/// assert_eq!(RequireName::new("a.b").unwrap().target(), Target::Exact("a.b"));
/// assert!(RequireName::new("a*").is_err());
/// assert!(RequireName::new("**").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequireName(String);

impl RequireName {
    /// Create a new validated requirement name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRequireName` if the name violates the grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if is_require_name(&name) {
            Ok(Self(name))
        } else {
            Err(TypeError::InvalidRequireName(name))
        }
    }

    /// Get the requirement as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the requirement.
    pub fn target(&self) -> Target<'_> {
        if self.0 == "*" {
            Target::All
        } else if let Some(prefix) = self.0.strip_suffix('*') {
            Target::Prefix(prefix)
        } else {
            Target::Exact(&self.0)
        }
    }

    /// The unit this requirement names, if it is not a wildcard.
    pub fn unit_name(&self) -> Option<UnitName> {
        (!self.is_wildcard()).then(|| UnitName(self.0.clone()))
    }

    /// Whether the requirement contains a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.0.ends_with('*')
    }
}

impl TryFrom<String> for RequireName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for RequireName {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RequireName> for String {
    fn from(name: RequireName) -> Self {
        name.0
    }
}

impl AsRef<str> for RequireName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequireName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &[&str] = &[
        "a",
        "a1",
        "a$",
        "a_",
        "aaa.a11",
        "aaa.$$$.___",
        "$",
        "$1",
        "$$$.___.aaa",
        "_",
        "___._11",
        "AAA.BBB",
        "T.s._.$.AbC123.__dEF__.$$gHi$$",
    ];

    const REQUIRE_ONLY: &[&str] = &["*", "aaa.*", "aaa.a11.*", "aaa.$$$.*", "T.s._.$.AbC123.__dEF__.*"];

    const INVALID: &[&str] = &[
        "", "1", "1*", "1aaa", "1aaa.", "1aaa.bbb", "1aaa.*", "aaa.1bbb", "*aaa", "*aaa.bbb.*",
        "aaa*", "aaa*.bbb", "a*b*c", ".", "..", ".*", ".aaa", "aaa.", "aaa.bbb.", "**", "a-b",
        "a b", "aé",
    ];

    #[test]
    fn valid_names_are_unit_and_require_names() {
        for name in VALID {
            assert!(is_unit_name(name), "{name} should be a unit name");
            assert!(is_require_name(name), "{name} should be a require name");
        }
    }

    #[test]
    fn wildcard_forms_are_require_only() {
        for name in REQUIRE_ONLY {
            assert!(!is_unit_name(name), "{name} should not be a unit name");
            assert!(is_require_name(name), "{name} should be a require name");
        }
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in INVALID {
            assert!(!is_unit_name(name), "{name} should not be a unit name");
            assert!(!is_require_name(name), "{name} should not be a require name");
        }
    }

    #[test]
    fn target_classification() {
        assert_eq!(RequireName::new("*").unwrap().target(), Target::All);
        assert_eq!(
            RequireName::new("foo.bar.*").unwrap().target(),
            Target::Prefix("foo.bar.")
        );
        assert_eq!(RequireName::new("foo").unwrap().target(), Target::Exact("foo"));
        assert!(RequireName::new("foo.*").unwrap().is_wildcard());
        assert!(!RequireName::new("foo").unwrap().is_wildcard());
    }

    #[test]
    fn errors_carry_the_rejected_name() {
        assert_eq!(
            UnitName::new("a.").unwrap_err(),
            TypeError::InvalidUnitName("a.".into())
        );
        assert_eq!(
            RequireName::new("a*").unwrap_err(),
            TypeError::InvalidRequireName("a*".into())
        );
    }

    #[test]
    fn serde_rejects_invalid_names() {
        let ok: UnitName = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(ok.as_str(), "a.b");
        assert!(serde_json::from_str::<UnitName>("\"a.*\"").is_err());
        assert!(serde_json::from_str::<RequireName>("\"a.*\"").is_ok());
    }
}
