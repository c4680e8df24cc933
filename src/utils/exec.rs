//! Running external tools (`mmdc`, chromium, the platform opener).
//!
//! ```ignore
//! Cmd::new("mmdc").args(["--input", "in.mmd", "--output", "out.svg"]).run()?;
//! ```

use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::process::{Command, Output, Stdio};

/// An external command, run to completion with captured output.
#[derive(Debug)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
        }
    }

    /// Append an argument. Empty arguments are skipped.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn args<S: AsRef<OsStr>>(self, args: impl IntoIterator<Item = S>) -> Self {
        args.into_iter().fold(self, Self::arg)
    }

    /// Run with stdin closed. A non-zero exit is an error carrying the
    /// tool's own message.
    pub fn run(self) -> Result<Output> {
        let name = self.program.to_string_lossy().into_owned();
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run `{name}`"))?;

        if !output.status.success() {
            bail!(failure(&name, &output));
        }
        crate::debug!("exec"; "`{}` finished", name);
        Ok(output)
    }
}

/// `` `name` failed: <status> `` plus stderr, or stdout when stderr is empty.
fn failure(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|s| !s.is_empty());

    match detail {
        Some(detail) => format!("`{name}` failed: {}\n{detail}", output.status),
        None => format!("`{name}` failed: {}", output.status),
    }
}
