//! Integration tests for file-mode build ordering.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gumup::build::{concat, BuildError, BuildOrder, ConcatOptions, UnitCache};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A scratch project of unit files.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a unit file declaring `name` with `requires`.
    fn unit(&self, rel: &str, name: &str, requires: &[&str]) -> &Self {
        let mut text = format!("// @unit {name}\n");
        for req in requires {
            text.push_str(&format!("// @require {req}\n"));
        }
        text.push_str(&format!("var {} = 1;\n", name.replace('.', "_")));
        self.write(rel, &text)
    }

    fn write(&self, rel: &str, text: &str) -> &Self {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
        self
    }

    fn cache(&self) -> UnitCache {
        UnitCache::new(self.path()).unit_path(["src"])
    }

    fn order(&self, seeds: &[&str]) -> Result<Vec<String>, BuildError> {
        let mut cache = self.cache();
        let mut order = BuildOrder::new(&mut cache);
        for seed in seeds {
            order.add(seed)?;
        }
        Ok(order
            .resolve()?
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect())
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn dependencies_come_first() {
    let project = Project::new();
    project
        .unit("src/a.js", "a", &[])
        .unit("src/b.js", "b", &["a"])
        .unit("src/c.js", "c", &["b"])
        .unit("src/d.js", "d", &["a", "c", "b"]);

    let files = project.order(&["src/d.js"]).unwrap();
    assert_eq!(files, vec!["src/a.js", "src/b.js", "src/c.js", "src/d.js"]);
}

#[test]
fn nested_names_map_to_directories() {
    let project = Project::new();
    project
        .unit("src/app/models/user.js", "app.models.user", &[])
        .unit("src/main.js", "main", &["app.models.user"]);

    let files = project.order(&["src/main.js"]).unwrap();
    assert_eq!(files, vec!["src/app/models/user.js", "src/main.js"]);
}

#[test]
fn shared_dependencies_are_emitted_once_across_seeds() {
    let project = Project::new();
    project
        .unit("src/core.js", "core", &[])
        .unit("src/one.js", "one", &["core"])
        .unit("src/two.js", "two", &["core"]);

    let files = project.order(&["src/one.js", "src/two.js", "src/one.js"]).unwrap();
    assert_eq!(files, vec!["src/core.js", "src/one.js", "src/two.js"]);
}

#[test]
fn wildcards_only_match_loaded_units() {
    let project = Project::new();
    project
        .unit("src/lib/a.js", "lib.a", &[])
        .unit("src/lib/b.js", "lib.b", &["lib.a"])
        .unit("src/lib/unused.js", "lib.unused", &[])
        .unit("src/app.js", "app", &["lib.b", "lib.*"]);

    let files = project.order(&["src/app.js"]).unwrap();
    assert_eq!(files, vec!["src/lib/a.js", "src/lib/b.js", "src/app.js"]);
}

#[test]
fn wildcard_orders_against_later_seeds() {
    let project = Project::new();
    project
        .unit("src/main.js", "main", &["*"])
        .unit("src/util.js", "util", &[]);

    // util is only known because it is also a seed
    let files = project.order(&["src/main.js", "src/util.js"]).unwrap();
    assert_eq!(files, vec!["src/util.js", "src/main.js"]);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn missing_unit_lists_candidates() {
    let project = Project::new();
    project.unit("src/app.js", "app", &["nowhere.x"]);

    let err = project.order(&["src/app.js"]).unwrap_err();
    assert!(matches!(err, BuildError::UnitNotFound { .. }));
    assert!(err.to_string().contains("nowhere.x"));
}

#[test]
fn cycle_between_files() {
    let project = Project::new();
    project
        .unit("src/a.js", "a", &["b"])
        .unit("src/b.js", "b", &["a"]);

    let err = project.order(&["src/a.js"]).unwrap_err();
    assert!(matches!(err, BuildError::RecursiveDependency { .. }));
    assert!(err.to_string().starts_with("recursive dependency"));
}

#[test]
fn file_declaring_the_wrong_unit() {
    let project = Project::new();
    project
        .unit("src/util.js", "utils", &[])
        .unit("src/app.js", "app", &["util"]);

    let err = project.order(&["src/app.js"]).unwrap_err();
    assert!(matches!(err, BuildError::NameMismatch { .. }));
}

#[test]
fn two_files_declaring_one_unit() {
    let project = Project::new();
    project
        .unit("one.js", "same", &[])
        .unit("two.js", "same", &[]);

    let err = project.order(&["one.js", "two.js"]).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateUnit { .. }));
}

#[test]
fn seed_without_directive() {
    let project = Project::new();
    project.write("plain.js", "console.log('hi');\n");

    let err = project.order(&["plain.js"]).unwrap_err();
    assert!(matches!(err, BuildError::Scan { .. }));
}

// =============================================================================
// Concatenation
// =============================================================================

#[test]
fn concat_in_build_order() {
    let project = Project::new();
    project
        .write("src/a.js", "// @unit a\nA\n")
        .write("src/b.js", "// @unit b\n// @require a\nB\n");

    let files: Vec<PathBuf> = project
        .order(&["src/b.js"])
        .unwrap()
        .into_iter()
        .map(PathBuf::from)
        .collect();
    let options = ConcatOptions {
        banner: Some("/* bundle */\n".to_string()),
        ..ConcatOptions::default()
    };
    let out = concat(project.path(), &files, &options).unwrap();

    assert_eq!(
        out,
        "/* bundle */\n// @unit a\nA\n\n// @unit b\n// @require a\nB\n"
    );
}
