//! External command execution.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! Cmd::new("tar").args(["-czf", "site.tar.gz", "-C", parent, "public"]).run()?;
//! ```

use crate::debug;
use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
};

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        args.into_iter().fold(self, Self::arg)
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Execute the command, failing on a non-zero exit status.
    ///
    /// Stderr of a successful run is logged under the program name in verbose mode.
    pub fn run(self) -> Result<Output> {
        let name = self.program.to_string_lossy().into_owned();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !output.status.success() {
            bail!(format_error(&name, &output));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            debug!(&name; "{}", stderr);
        }
        Ok(output)
    }
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}", output.status);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(stderr);
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout);
    }
    msg
}
