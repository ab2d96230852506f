//! Manifest utility functions.

use std::path::{Path, PathBuf};

/// Find the manifest by searching upward from `start`.
///
/// Walks up parent directories until finding `config_name`.
/// Absolute `config_name`s are returned as-is when they exist.
///
/// # Example
/// ```text
/// /home/user/book/content/guide/  ← start
/// /home/user/book/strand.toml     ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}
