//! Stylesheet themes.
//!
//! Built-in themes ship inside the binary (minified at build time). User
//! themes come from `<config>/themes.toml`:
//!
//! ```toml
//! [[themes]]
//! name = "paper"
//! path = "paper.css"      # relative to the config dir
//!
//! [[themes]]
//! name = "tiny"
//! inline = "body { max-width: 40em }"
//! ```
//!
//! A user theme with the same name as a built-in one replaces it.

use super::error::ConfigError;
use super::paths;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME: &str = "github";

/// Maximum edit distance for a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    /// Embedded, already minified.
    Builtin(&'static str),
    Inline(String),
    Path(PathBuf),
    Url(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub source: ThemeSource,
}

impl Theme {
    /// Load and minify the stylesheet.
    pub fn resolve(&self) -> Result<String, ConfigError> {
        let css = match &self.source {
            ThemeSource::Builtin(css) => return Ok((*css).to_owned()),
            ThemeSource::Inline(css) => css.clone(),
            ThemeSource::Path(path) => {
                fs::read_to_string(path).map_err(|e| ConfigError::Io(path.clone(), e))?
            }
            ThemeSource::Url(_) => return Err(ConfigError::RemoteTheme(self.name.clone())),
            ThemeSource::Missing => return Err(ConfigError::NoSource(self.name.clone())),
        };
        minify_css(&self.name, &css)
    }

    pub const fn is_builtin(&self) -> bool {
        matches!(self.source, ThemeSource::Builtin(_))
    }
}

/// One `[[themes]]` entry as written in `themes.toml`.
#[derive(Debug, Deserialize)]
struct ThemeEntry {
    name: String,
    path: Option<PathBuf>,
    inline: Option<String>,
    url: Option<String>,
}

impl ThemeEntry {
    fn into_theme(self, config_dir: &Path) -> Theme {
        let source = if let Some(inline) = self.inline {
            ThemeSource::Inline(inline)
        } else if let Some(path) = self.path {
            ThemeSource::Path(paths::resolve_relative(config_dir, &path))
        } else if let Some(url) = self.url {
            ThemeSource::Url(url)
        } else {
            ThemeSource::Missing
        };
        Theme {
            name: self.name,
            source,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ThemesFile {
    #[serde(default)]
    themes: Vec<ThemeEntry>,
}

/// All known themes, built-ins first.
#[derive(Debug, Clone)]
pub struct Themes {
    themes: Vec<Theme>,
}

impl Themes {
    /// Only the embedded themes.
    pub fn builtin() -> Self {
        let themes = crate::embed::themes::BUILTIN
            .iter()
            .map(|&(name, css)| Theme {
                name: name.to_owned(),
                source: ThemeSource::Builtin(css),
            })
            .collect();
        Self { themes }
    }

    /// Built-ins merged with `<config_dir>/themes.toml` if it exists.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let mut themes = Self::builtin();
        let file = paths::themes_file(config_dir);
        if !file.exists() {
            return Ok(themes);
        }

        let content = fs::read_to_string(&file).map_err(|e| ConfigError::Io(file.clone(), e))?;
        let parsed: ThemesFile =
            toml::from_str(&content).map_err(|e| ConfigError::Toml(file.clone(), e))?;

        for entry in parsed.themes {
            themes.insert(entry.into_theme(config_dir));
        }
        crate::debug!("config"; "loaded {} themes from {}", themes.themes.len(), file.display());
        Ok(themes)
    }

    fn insert(&mut self, theme: Theme) {
        match self.themes.iter_mut().find(|t| t.name == theme.name) {
            Some(existing) => *existing = theme,
            None => self.themes.push(theme),
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    /// Closest theme name within a small edit distance.
    pub fn closest_match(&self, name: &str) -> Option<&str> {
        self.names()
            .map(|candidate| (candidate, levenshtein_distance(name, candidate)))
            .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(_, distance)| *distance)
            .map(|(candidate, _)| candidate)
    }

    /// Like [`Themes::by_name`] but with a suggestion in the error.
    pub fn find(&self, name: &str) -> Result<&Theme, ConfigError> {
        self.by_name(name).ok_or_else(|| ConfigError::UnknownTheme {
            name: name.to_owned(),
            closest: self.closest_match(name).map(str::to_owned),
        })
    }
}

fn minify_css(name: &str, source: &str) -> Result<String, ConfigError> {
    let css_error = |message: String| ConfigError::Css {
        name: name.to_owned(),
        message,
    };
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| css_error(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| css_error(e.to_string()))?;
    Ok(result.code)
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_themes(dir: &Path, toml: &str) {
        fs::write(dir.join("themes.toml"), toml).unwrap();
    }

    #[test]
    fn test_builtin_themes() {
        let themes = Themes::builtin();
        let names: Vec<_> = themes.names().collect();
        assert_eq!(names, ["github", "github-dark", "sepia"]);
        assert!(themes.by_name(DEFAULT_THEME).unwrap().is_builtin());
    }

    #[test]
    fn test_builtin_resolves() {
        let css = Themes::builtin().find("sepia").unwrap().resolve().unwrap();
        assert!(!css.is_empty());
    }

    #[test]
    fn test_load_without_file() {
        let dir = TempDir::new().unwrap();
        let themes = Themes::load(dir.path()).unwrap();
        assert_eq!(themes.iter().count(), 3);
    }

    #[test]
    fn test_load_user_themes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("paper.css"), "body {  color : #000000 ; }").unwrap();
        write_themes(
            dir.path(),
            r#"
            [[themes]]
            name = "paper"
            path = "paper.css"

            [[themes]]
            name = "tiny"
            inline = "p { margin: 0px }"
            "#,
        );

        let themes = Themes::load(dir.path()).unwrap();
        let paper = themes.find("paper").unwrap();
        assert_eq!(
            paper.source,
            ThemeSource::Path(dir.path().join("paper.css"))
        );
        assert_eq!(paper.resolve().unwrap(), "body{color:#000}");
        assert_eq!(themes.find("tiny").unwrap().resolve().unwrap(), "p{margin:0}");
    }

    #[test]
    fn test_user_theme_replaces_builtin() {
        let dir = TempDir::new().unwrap();
        write_themes(
            dir.path(),
            "[[themes]]\nname = \"github\"\ninline = \"a { color: red }\"\n",
        );
        let themes = Themes::load(dir.path()).unwrap();
        assert_eq!(themes.iter().count(), 3);
        assert!(!themes.find("github").unwrap().is_builtin());
    }

    #[test]
    fn test_url_theme_rejected() {
        let dir = TempDir::new().unwrap();
        write_themes(
            dir.path(),
            "[[themes]]\nname = \"remote\"\nurl = \"https://example.com/a.css\"\n",
        );
        let themes = Themes::load(dir.path()).unwrap();
        let err = themes.find("remote").unwrap().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::RemoteTheme(name) if name == "remote"));
    }

    #[test]
    fn test_theme_without_source() {
        let dir = TempDir::new().unwrap();
        write_themes(dir.path(), "[[themes]]\nname = \"empty\"\n");
        let themes = Themes::load(dir.path()).unwrap();
        let err = themes.find("empty").unwrap().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::NoSource(_)));
    }

    #[test]
    fn test_missing_theme_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        write_themes(dir.path(), "[[themes]]\nname = \"gone\"\npath = \"gone.css\"\n");
        let themes = Themes::load(dir.path()).unwrap();
        let err = themes.find("gone").unwrap().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        write_themes(dir.path(), "[[themes]\nname = ");
        assert!(matches!(
            Themes::load(dir.path()),
            Err(ConfigError::Toml(..))
        ));
    }

    #[test]
    fn test_closest_match() {
        let themes = Themes::builtin();
        assert_eq!(themes.closest_match("githb"), Some("github"));
        assert_eq!(themes.closest_match("github-drak"), Some("github-dark"));
        assert_eq!(themes.closest_match("sepa"), Some("sepia"));
        assert_eq!(themes.closest_match("solarized-light"), None);
    }

    #[test]
    fn test_find_unknown_suggests() {
        let themes = Themes::builtin();
        match themes.find("gthub") {
            Err(ConfigError::UnknownTheme { name, closest }) => {
                assert_eq!(name, "gthub");
                assert_eq!(closest.as_deref(), Some("github"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("sepia", "sepia"), 0);
    }
}
