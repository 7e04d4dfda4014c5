//! # File Discovery
//!
//! Expands glob patterns into file lists. Results keep the order in which
//! they were first produced and contain no duplicates.
//!
//! A pattern ending in `**` (`vendor/**`) selects every file below the
//! matched directories.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Expand every pattern and flatten the matches, dropping repeats.
///
/// Directories matched by a pattern are skipped.
pub fn glob_files<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = glob::glob(&file_pattern(pattern))
            .with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        for entry in paths {
            let path = entry.with_context(|| format!("cannot read match of '{pattern}'"))?;
            if path.is_dir() {
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    tracing::debug!(patterns = patterns.len(), files = files.len(), "globbed files");
    Ok(files)
}

/// `glob` matches only directories with a trailing `**`; reach their files.
fn file_pattern(pattern: &str) -> Cow<'_, str> {
    if pattern == "**" || pattern.ends_with("/**") {
        Cow::Owned(format!("{pattern}/*"))
    } else {
        Cow::Borrowed(pattern)
    }
}

/// `files` without any path in `remove`, order preserved.
pub fn difference(files: Vec<PathBuf>, remove: &[PathBuf]) -> Vec<PathBuf> {
    let remove: HashSet<&PathBuf> = remove.iter().collect();
    files.into_iter().filter(|f| !remove.contains(f)).collect()
}
