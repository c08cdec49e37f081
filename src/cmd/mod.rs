//! Command module structure for the attrex CLI

use anyhow::Result;
use std::path::PathBuf;

pub mod convert;

/// Expand and validate a user-supplied root directory.
pub fn resolve_root(root: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(root);
    let path = PathBuf::from(expanded.as_ref());
    if !path.is_dir() {
        anyhow::bail!("Not a directory: {}", path.display());
    }
    Ok(path)
}
