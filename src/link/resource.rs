//! Resource variants - producers of exactly one filesystem entry.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::page::{self, Fragment};

use super::path::relative_path;
use super::{LinkError, Linker, Reference};

/// A unit of content that can declare its dependencies and write itself out.
#[derive(Debug, Clone)]
pub enum Resource {
    /// A source file copied verbatim.
    Static {
        /// File to copy from
        source: PathBuf,
    },
    /// A symlink to another resource's output.
    Link {
        /// Reference whose output the symlink points at
        target: Reference,
    },
    /// A content tree serialized to HTML, with embedded references late-bound.
    Rendered {
        /// Content tree (leaves and attribute values may embed references)
        fragment: Fragment,
    },
}

impl Resource {
    /// Create a static resource from a source file path.
    pub fn copy(source: impl Into<PathBuf>) -> Self {
        Self::Static {
            source: source.into(),
        }
    }

    /// Create a symlink resource pointing at `target`.
    pub fn link(target: impl Into<Reference>) -> Self {
        Self::Link {
            target: target.into(),
        }
    }

    /// Create a rendered resource from a content tree.
    pub const fn rendered(fragment: Fragment) -> Self {
        Self::Rendered { fragment }
    }

    /// Short name of the variant (used for progress and reports).
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Static { .. } => "static",
            Self::Link { .. } => "link",
            Self::Rendered { .. } => "rendered",
        }
    }

    /// References this resource depends on.
    ///
    /// Pure: repeated calls return the same set.
    pub fn references(&self) -> FxHashSet<Reference> {
        match self {
            Self::Static { .. } => FxHashSet::default(),
            Self::Link { target } => std::iter::once(target.clone()).collect(),
            Self::Rendered { fragment } => fragment.references(),
        }
    }

    /// Write this resource's single filesystem entry at `path`.
    ///
    /// The parent directory must already exist. Other resources' outputs
    /// may not exist yet; only their paths are available via `linker`.
    pub fn populate_fs(&self, path: &Path, linker: &Linker) -> Result<(), LinkError> {
        match self {
            Self::Static { source } => {
                fs::copy(source, path).map_err(|e| LinkError::io(source, e))?;
            }
            Self::Link { target } => {
                let real = linker.resolve(target, true)?;
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                let rel = relative_path(base, &real);
                symlink(&rel, path).map_err(|e| LinkError::io(path, e))?;
            }
            Self::Rendered { fragment } => {
                let html = page::render(fragment, |reference| linker.url_for(reference, path))?;
                fs::write(path, html).map_err(|e| LinkError::io(path, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{AttrValue, h};
    use tempfile::TempDir;

    #[test]
    fn test_static_has_no_references() {
        let resource = Resource::copy("a.txt");
        assert!(resource.references().is_empty());
        assert_eq!(resource.kind(), "static");
    }

    #[test]
    fn test_link_references_target() {
        let resource = Resource::link("a");
        let refs = resource.references();
        assert_eq!(refs.len(), 1);
        assert!(refs.contains("a"));
    }

    #[test]
    fn test_rendered_references_are_stable() {
        let fragment = h(
            "a",
            [("href", AttrValue::from(Reference::new("docs/b.md")))],
            Fragment::reference("docs/c.md"),
        );
        let resource = Resource::rendered(fragment);
        let first = resource.references();
        let second = resource.references();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_static_copies_bytes() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.bin");
        let bytes: Vec<u8> = (0..=255).collect();
        fs::write(&source, &bytes).unwrap();

        let linker = Linker::new(dir.path().join("out"));
        fs::create_dir_all(linker.root()).unwrap();
        let dest = linker.root().join("copy.bin");
        Resource::copy(&source).populate_fs(&dest, &linker).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_static_missing_source_is_io_error() {
        let dir = TempDir::new().unwrap();
        let linker = Linker::new(dir.path());
        let err = Resource::copy(dir.path().join("missing"))
            .populate_fs(&dir.path().join("dest"), &linker)
            .unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_link_target_is_relative_to_parent() {
        let dir = TempDir::new().unwrap();
        let mut linker = Linker::new(dir.path().join("out"));
        linker
            .add_resource("a", "assets/a.txt", Resource::copy("unused"))
            .unwrap();

        let dest_dir = linker.root().join("docs");
        fs::create_dir_all(&dest_dir).unwrap();
        let dest = dest_dir.join("a.txt");
        Resource::link("a").populate_fs(&dest, &linker).unwrap();

        assert_eq!(
            fs::read_link(&dest).unwrap(),
            PathBuf::from("../assets/a.txt")
        );
    }

    #[test]
    fn test_link_to_unregistered_is_dangling() {
        let dir = TempDir::new().unwrap();
        let linker = Linker::new(dir.path());
        let err = Resource::link("nowhere")
            .populate_fs(&dir.path().join("x"), &linker)
            .unwrap_err();
        assert!(err.is_dangling());
    }
}
