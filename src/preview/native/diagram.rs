//! Diagram rendering through the mermaid CLI (`mmdc`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::preview::capability::{CapabilityError, DiagramConfig, DiagramFuture, DiagramRenderer};
use crate::utils::exec::Cmd;

const PROGRAM: &str = "mmdc";

#[derive(Debug, Clone)]
pub struct Mmdc {
    program: PathBuf,
}

impl Mmdc {
    /// Locate `mmdc` in `PATH`.
    pub fn detect() -> Result<Self, CapabilityError> {
        which::which(PROGRAM)
            .map(|program| Self { program })
            .map_err(|_| CapabilityError::MissingTool(PROGRAM))
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DiagramRenderer for Mmdc {
    // Every invocation is a fresh process, so there is nothing to configure.
    fn initialize(&self, _: &DiagramConfig) {}

    fn render(&self, id: &str, source: &str) -> DiagramFuture {
        let program = self.program.clone();
        let id = id.to_owned();
        let source = source.to_owned();

        Box::pin(async move {
            tokio::task::spawn_blocking(move || render_blocking(&program, &id, &source))
                .await
                .context("diagram task panicked")?
        })
    }
}

fn render_blocking(program: &Path, id: &str, source: &str) -> Result<String, CapabilityError> {
    let dir = tempfile::tempdir().context("failed to create scratch dir")?;
    let input = dir.path().join("diagram.mmd");
    let output = dir.path().join("diagram.svg");

    fs::write(&input, source).with_context(|| format!("failed to write {}", input.display()))?;

    Cmd::new(program)
        .arg("--quiet")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--svgId", id, "--backgroundColor", "transparent"])
        .run()?;

    let svg = fs::read_to_string(&output)
        .with_context(|| format!("`{PROGRAM}` produced no output for {id}"))?;
    Ok(svg)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Fake `mmdc` that wraps the input in an svg tagged with the id.
    fn fake_mmdc(dir: &Path) -> PathBuf {
        let script = dir.join("mmdc");
        fs::write(
            &script,
            r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    --input) in="$2"; shift ;;
    --output) out="$2"; shift ;;
    --svgId) id="$2"; shift ;;
  esac
  shift
done
printf '<svg id="%s">%s</svg>' "$id" "$(cat "$in")" > "$out"
"#,
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[tokio::test]
    async fn test_render_passes_id_and_source() {
        let dir = tempfile::tempdir().unwrap();
        let mmdc = Mmdc::with_program(fake_mmdc(dir.path()));
        let svg = mmdc.render("mermaid3", "graph TD").await.unwrap();
        assert_eq!(svg, r#"<svg id="mermaid3">graph TD</svg>"#);
    }

    #[tokio::test]
    async fn test_failing_tool_is_an_error() {
        let mmdc = Mmdc::with_program("/bin/false");
        assert!(mmdc.render("mermaid0", "graph TD").await.is_err());
    }
}
