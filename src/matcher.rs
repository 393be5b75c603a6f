//! File matching for exec processors.
//! Walks a directory tree and keeps the regular files whose base name matches a
//! glob pattern.

use crate::error::Result;
use globset::{Glob, GlobMatcher};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compiles `pattern` for matching against base names.
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    Ok(Glob::new(pattern)?.compile_matcher())
}

/// Walks `root` and returns every file whose base name matches `pattern`.
///
/// # Arguments
/// * `root` - Directory to walk, recursively and without depth limit
/// * `pattern` - Glob pattern matched against the file name only
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Matched paths, in directory listing order
///
/// # Errors
/// * `Error::GlobSetParseError` if the pattern is invalid
/// * `Error::WalkError` as soon as any directory cannot be read
pub fn find_matches<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let matcher = compile_pattern(pattern)?;
    let mut matches = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            debug!("Skipping directory: {}", entry.path().display());
            continue;
        }
        if matcher.is_match(entry.file_name()) {
            debug!("Found match: {}", entry.path().display());
            matches.push(entry.into_path());
        }
    }

    debug!("Found {} match(es) for '{}' under {}", matches.len(), pattern, root.display());
    Ok(matches)
}
