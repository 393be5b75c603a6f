//! Artifact output for rendered content.

use crate::error::Result;
use log::debug;
use std::fs;
use std::path::Path;

/// Writes `content` to `dest_path`, creating missing parent directories first.
///
/// An existing file is truncated and overwritten. The write is not atomic.
pub fn write_artifact<P: AsRef<Path>>(dest_path: P, content: &str) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest_path, content)?;
    debug!("Wrote {} byte(s) to {}", content.len(), dest_path.display());
    Ok(())
}
