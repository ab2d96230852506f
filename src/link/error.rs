//! Linker error types.

use std::path::PathBuf;

use thiserror::Error;

use super::Reference;

/// Errors raised while registering, resolving or materializing resources.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("reference `{reference}` is already registered")]
    DuplicateReference { reference: Reference },

    #[error(
        "output path `{}` for `{reference}` is already claimed by `{existing}`",
        .path.display()
    )]
    DuplicatePath {
        path: PathBuf,
        existing: Reference,
        reference: Reference,
    },

    #[error(
        "output path `{}` for `{reference}` must be a relative path inside the output root",
        .path.display()
    )]
    InvalidPath { reference: Reference, path: PathBuf },

    #[error("dangling reference `{reference}`{}", referrer_suffix(.referrer.as_ref()))]
    DanglingReference {
        reference: Reference,
        /// Resource that declared the dependency (`None` for entries and direct resolves)
        referrer: Option<Reference>,
    },

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn referrer_suffix(referrer: Option<&Reference>) -> String {
    referrer
        .map(|r| format!(" (referenced by `{r}`)"))
        .unwrap_or_default()
}

impl LinkError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Registration conflict: duplicate reference or duplicate output path.
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateReference { .. } | Self::DuplicatePath { .. }
        )
    }

    /// Dependency graph points at an unregistered reference.
    pub const fn is_dangling(&self) -> bool {
        matches!(self, Self::DanglingReference { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_dangling_display() {
        let err = LinkError::DanglingReference {
            reference: Reference::new("y"),
            referrer: Some(Reference::new("x")),
        };
        let display = err.to_string();
        assert!(display.contains("`y`"));
        assert!(display.contains("referenced by `x`"));

        let err = LinkError::DanglingReference {
            reference: Reference::new("y"),
            referrer: None,
        };
        assert_eq!(err.to_string(), "dangling reference `y`");
    }

    #[test]
    fn test_classification() {
        let dup = LinkError::DuplicateReference {
            reference: Reference::new("a"),
        };
        assert!(dup.is_conflict());
        assert!(!dup.is_dangling());

        let io = LinkError::io("out/a.txt", Error::new(ErrorKind::PermissionDenied, "denied"));
        assert!(!io.is_conflict());
        assert!(io.to_string().contains("out/a.txt"));
    }
}
