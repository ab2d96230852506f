//! Lexical path helpers for output paths.
//!
//! All computations are purely lexical: output paths are not required to
//! exist when they are registered or resolved.

use std::path::{Component, Path, PathBuf};

/// Normalize a registered output path.
///
/// Drops `.` components. Returns `None` for paths that could escape the
/// output root or address it directly: empty paths, absolute paths,
/// prefixes (`C:`) and `..` components.
pub fn normalize_output_path(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!normalized.as_os_str().is_empty()).then_some(normalized)
}

/// Compute the path of `target` relative to the directory `base`.
///
/// Both paths must be expressed against the same anchor (both absolute or
/// both relative to the same directory).
///
/// # Example
/// ```ignore
/// let rel = relative_path(Path::new("/out/site"), Path::new("/out/site/assets/a.css"));
/// assert_eq!(rel, PathBuf::from("assets/a.css"));
/// ```
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<_> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let target: Vec<_> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Render a relative path as a `/`-separated URL path.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
