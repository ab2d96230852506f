//! Staging directory for all-or-nothing builds.
//!
//! A build links into a sibling directory of the final output. Only a
//! successful build is promoted; a failed one is removed on drop, leaving
//! the previous output untouched.
//!
//! ```text
//! public/                      <- previous good output
//! .public.staging-4242/        <- link() writes here
//!
//! promote():
//!   public/  -> .public.old-4242/
//!   .public.staging-4242/ -> public/
//!   remove .public.old-4242/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::debug;

/// A disposable output root promoted to its final location on success.
#[derive(Debug)]
pub struct Staging {
    output: PathBuf,
    dir: PathBuf,
    promoted: bool,
}

impl Staging {
    /// Create a fresh staging directory next to `output`.
    pub fn new(output: &Path) -> Result<Self> {
        let dir = sibling(output, "staging")?;
        if fs::symlink_metadata(&dir).is_ok() {
            remove_entry(&dir)
                .with_context(|| format!("failed to remove stale staging `{}`", dir.display()))?;
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create staging `{}`", dir.display()))?;
        debug!("stage"; "staging at {}", dir.display());

        Ok(Self {
            output: output.to_path_buf(),
            dir,
            promoted: false,
        })
    }

    /// Output root to link into.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Replace the final output with the staged tree.
    ///
    /// The previous output is moved aside first and restored if the swap fails.
    pub fn promote(mut self) -> Result<()> {
        let backup = sibling(&self.output, "old")?;
        let had_previous = fs::symlink_metadata(&self.output).is_ok();

        if had_previous {
            if fs::symlink_metadata(&backup).is_ok() {
                remove_entry(&backup)?;
            }
            fs::rename(&self.output, &backup).with_context(|| {
                format!("failed to move previous output `{}` aside", self.output.display())
            })?;
        }

        if let Err(e) = fs::rename(&self.dir, &self.output) {
            if had_previous {
                let _ = fs::rename(&backup, &self.output);
            }
            return Err(e).with_context(|| {
                format!("failed to promote staging to `{}`", self.output.display())
            });
        }
        self.promoted = true;

        if had_previous {
            remove_entry(&backup).with_context(|| {
                format!("failed to remove previous output `{}`", backup.display())
            })?;
        }
        debug!("stage"; "promoted {}", self.output.display());
        Ok(())
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if !self.promoted && let Err(e) = fs::remove_dir_all(&self.dir) {
            debug!("stage"; "failed to discard staging {}: {}", self.dir.display(), e);
        }
    }
}

/// `.<name>.<tag>-<pid>` next to `output`.
fn sibling(output: &Path, tag: &str) -> Result<PathBuf> {
    let name = output
        .file_name()
        .ok_or_else(|| anyhow!("output path `{}` has no final component", output.display()))?;
    let parent = output.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(format!(
        ".{}.{}-{}",
        name.to_string_lossy(),
        tag,
        std::process::id()
    )))
}

/// Remove a file, symlink or directory tree.
fn remove_entry(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
