//! build::concat
//!
//! Concatenation of unit files in build order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::BuildError;

/// Options for [`concat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatOptions {
    /// Text written before the first file
    pub banner: Option<String>,
    /// Text written between files
    pub separator: String,
}

impl Default for ConcatOptions {
    fn default() -> Self {
        Self {
            banner: None,
            separator: "\n".to_string(),
        }
    }
}

/// Join the contents of `files`, in order.
///
/// Relative paths are read relative to `base`.
pub fn concat(base: &Path, files: &[PathBuf], options: &ConcatOptions) -> Result<String, BuildError> {
    let mut out = options.banner.clone().unwrap_or_default();
    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            out.push_str(&options.separator);
        }
        let text = fs::read_to_string(base.join(file)).map_err(|source| BuildError::Io {
            path: file.clone(),
            source,
        })?;
        out.push_str(&text);
    }
    tracing::debug!(files = files.len(), bytes = out.len(), "concatenated units");
    Ok(out)
}

/// Write `contents` to `path` through a temporary file and a rename.
pub fn write_output(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error(path))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path).map_err(write_error(&temp_path))?;
    file.write_all(contents.as_bytes())
        .map_err(write_error(&temp_path))?;
    file.sync_all().map_err(write_error(&temp_path))?;

    fs::rename(&temp_path, path).map_err(write_error(path))
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError {
    let path = path.to_path_buf();
    move |source| BuildError::Write { path, source }
}
