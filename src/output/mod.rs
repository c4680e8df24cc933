//! Writing rendered documents.
//!
//! ```text
//! Document --render--> page --[pdf]--> bytes --> file | stdout
//! ```

mod pdf;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::RenderConfig;
use crate::document::Document;
use crate::preview::Capabilities;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Stdout,
}

impl Target {
    /// Human-readable name for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdout => "stdout".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Pdf,
}

impl Format {
    /// `.pdf` selects PDF, anything else HTML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Html,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub target: Target,
    pub format: Format,
    pub config: RenderConfig,
    /// Native backends used when pre-rendering.
    pub capabilities: Capabilities,
}

impl OutputOptions {
    /// PDF has no browser to run scripts in, so it is always pre-rendered.
    pub const fn prerenders(&self) -> bool {
        self.config.prerender || matches!(self.format, Format::Pdf)
    }
}

/// Render `document` and write it out. Returns the number of bytes written.
pub async fn write(document: &Document, options: &OutputOptions) -> Result<usize> {
    let page = if options.prerenders() {
        document
            .render_prerendered(&options.config, options.capabilities.clone())
            .await
    } else {
        document.render(&options.config)
    };

    let bytes = match options.format {
        Format::Html => page.into_bytes(),
        Format::Pdf => tokio::task::spawn_blocking(move || pdf::print(&page))
            .await
            .context("pdf worker panicked")??,
    };

    write_bytes(&options.target, &bytes)?;
    Ok(bytes.len())
}

/// Write raw bytes to `target`, creating parent directories as needed.
pub fn write_bytes(target: &Target, bytes: &[u8]) -> Result<()> {
    match target {
        Target::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        Target::Stdout => {
            let mut out = std::io::stdout().lock();
            out.write_all(bytes).context("failed to write stdout")?;
            out.flush().context("failed to flush stdout")
        }
    }
}

/// Open `target` (a path or url) with the platform's default handler.
pub fn open(target: &str) -> Result<()> {
    ::open::that(target).with_context(|| format!("failed to open {target}"))?;
    crate::debug!("open"; "opened {}", target);
    Ok(())
}
