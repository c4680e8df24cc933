//! Config directory discovery.
//!
//! `<config>` is `$XDG_CONFIG_HOME/marky` when the variable is set and
//! non-empty, `~/.config/marky` otherwise.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "marky";
pub const THEMES_FILE: &str = "themes.toml";

/// Config directory for the current environment.
pub fn config_dir() -> PathBuf {
    config_dir_from(std::env::var_os("XDG_CONFIG_HOME"))
}

/// Config directory given the value of `XDG_CONFIG_HOME`.
pub fn config_dir_from(xdg: Option<OsString>) -> PathBuf {
    let base = match xdg.filter(|dir| !dir.is_empty()) {
        Some(dir) => expand(Path::new(&dir)),
        None => expand(Path::new("~/.config")),
    };
    base.join(APP_NAME)
}

/// `<config>/themes.toml`
pub fn themes_file(config_dir: &Path) -> PathBuf {
    config_dir.join(THEMES_FILE)
}

/// Expand a leading `~` and anchor relative paths at `base`.
pub fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    let path = expand(path);
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_from_xdg() {
        let dir = config_dir_from(Some("/tmp/xdg".into()));
        assert_eq!(dir, PathBuf::from("/tmp/xdg/marky"));
    }

    #[test]
    fn test_config_dir_empty_xdg_falls_back() {
        let dir = config_dir_from(Some(OsString::new()));
        assert!(dir.ends_with(".config/marky"));
    }

    #[test]
    fn test_config_dir_without_xdg() {
        let dir = config_dir_from(None);
        assert!(dir.ends_with(".config/marky"));
    }

    #[test]
    fn test_resolve_relative() {
        let base = Path::new("/etc/marky");
        assert_eq!(
            resolve_relative(base, Path::new("dark.css")),
            PathBuf::from("/etc/marky/dark.css")
        );
        assert_eq!(
            resolve_relative(base, Path::new("/srv/light.css")),
            PathBuf::from("/srv/light.css")
        );
    }

    #[test]
    fn test_themes_file() {
        assert_eq!(
            themes_file(Path::new("/c")),
            PathBuf::from("/c/themes.toml")
        );
    }
}
