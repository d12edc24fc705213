//! build::scanner
//!
//! Static extraction of unit declarations from source text.
//!
//! File mode never runs unit code. A [`DeclarationScanner`] reads the text
//! of a unit file and reports the unit name it declares and the names it
//! requires, which is all the build order needs.
//!
//! # Directive format
//!
//! [`DirectiveScanner`] looks for one directive per line, optionally behind
//! a line comment marker (`//`, `#`, `--`, `;`) or inside a block comment
//! (`/*`, ` * `, `*/`):
//!
//! ```text
//! // @unit app.server
//! // @require app.config
//! // @require app.routes.*
//! ```
//!
//! Exactly one `@unit` directive is required. `@require` directives keep
//! their order.
//!
//! A directive line holds the directive, one name and nothing else, apart
//! from a closing `*/`. A line that starts like a directive but carries
//! anything more (`// @require a  // db`) or no name at all is a
//! [`ScanError::MalformedDirective`]. Directives mentioned mid-line are
//! prose and ignored.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::types::{RequireName, TypeError, UnitName};

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?://+|#+|--+|;+|/\*+|\*+)?\s*@(unit|require)\s+(\S+?)\s*(?:\*+/)?\s*$")
        .expect("static regex")
});

static DIRECTIVE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?://+|#+|--+|;+|/\*+|\*+)?\s*@(unit|require)\b").expect("static regex")
});

/// Errors from scanning one source text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("no @unit directive found")]
    MissingUnit,

    #[error("line {line}: second @unit directive, '{first}' is already declared")]
    MultipleUnits { line: usize, first: UnitName },

    #[error("line {line}: malformed @{directive} directive '{text}'")]
    MalformedDirective {
        line: usize,
        directive: String,
        text: String,
    },

    #[error("line {line}: {source}")]
    InvalidName {
        line: usize,
        #[source]
        source: TypeError,
    },
}

/// What a unit file declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedUnit {
    pub name: UnitName,
    pub dependencies: Vec<RequireName>,
}

/// Reads unit declarations out of source text.
pub trait DeclarationScanner {
    /// Scan the full text of one unit file.
    fn scan(&self, source: &str) -> Result<ScannedUnit, ScanError>;
}

/// Scanner for `@unit` / `@require` comment directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveScanner;

impl DeclarationScanner for DirectiveScanner {
    fn scan(&self, source: &str) -> Result<ScannedUnit, ScanError> {
        let mut name: Option<UnitName> = None;
        let mut dependencies = Vec::new();

        for (index, text) in source.lines().enumerate() {
            let line = index + 1;
            let Some(caps) = DIRECTIVE.captures(text) else {
                if let Some(start) = DIRECTIVE_START.captures(text) {
                    return Err(ScanError::MalformedDirective {
                        line,
                        directive: start[1].to_string(),
                        text: text.trim().to_string(),
                    });
                }
                continue;
            };
            let invalid = |source| ScanError::InvalidName { line, source };

            if &caps[1] == "unit" {
                if let Some(first) = name {
                    return Err(ScanError::MultipleUnits { line, first });
                }
                name = Some(UnitName::new(&caps[2]).map_err(invalid)?);
            } else {
                dependencies.push(RequireName::new(&caps[2]).map_err(invalid)?);
            }
        }

        let name = name.ok_or(ScanError::MissingUnit)?;
        Ok(ScannedUnit { name, dependencies })
    }
}
