//! PDF export through a headless Chromium.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use url::Url;

use crate::utils::exec::Cmd;

/// Browsers tried in order.
const BROWSERS: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// First Chromium-family browser in `PATH`.
pub(super) fn find_browser() -> Result<PathBuf> {
    BROWSERS
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| anyhow!("no chromium or google-chrome in PATH, required for pdf output"))
}

/// Print `html` to PDF. Blocking.
pub(super) fn print(html: &str) -> Result<Vec<u8>> {
    let browser = find_browser()?;
    print_with(&browser, html)
}

fn print_with(browser: &Path, html: &str) -> Result<Vec<u8>> {
    let dir = tempfile::tempdir().context("failed to create scratch dir")?;
    let page = dir.path().join("page.html");
    let pdf = dir.path().join("page.pdf");

    fs::write(&page, html).with_context(|| format!("failed to write {}", page.display()))?;
    let url = Url::from_file_path(&page)
        .map_err(|()| anyhow!("cannot build a file url for {}", page.display()))?;

    Cmd::new(browser)
        .args(["--headless", "--disable-gpu", "--no-pdf-header-footer"])
        .arg(format!("--print-to-pdf={}", pdf.display()))
        .arg(url.as_str())
        .run()?;

    fs::read(&pdf).with_context(|| format!("`{}` produced no pdf", browser.display()))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Fake browser that writes the page url into the requested pdf path.
    fn fake_browser(dir: &Path) -> PathBuf {
        let script = dir.join("chromium");
        fs::write(
            &script,
            "#!/bin/sh\nfor a in \"$@\"; do case \"$a\" in --print-to-pdf=*) out=\"${a#--print-to-pdf=}\";; file://*) url=\"$a\";; esac; done\nprintf '%%PDF %s' \"$url\" > \"$out\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[test]
    fn test_print_with_fake_browser() {
        let dir = tempfile::tempdir().unwrap();
        let browser = fake_browser(dir.path());
        let bytes = print_with(&browser, "<p>hi</p>").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF file://"));
        assert!(text.ends_with("page.html"));
    }

    #[test]
    fn test_failing_browser_is_error() {
        let err = print_with(Path::new("/bin/false"), "<p>hi</p>").unwrap_err();
        assert!(err.to_string().contains("failed"));
    }
}
