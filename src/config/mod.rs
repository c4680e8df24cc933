//! Configuration for marky.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error.rs   # ConfigError
//! ├── paths.rs   # <config> directory discovery
//! ├── theme.rs   # built-in and user themes
//! └── mod.rs     # RenderConfig (this file)
//! ```

mod error;
pub mod paths;
mod theme;

pub use error::ConfigError;
pub use theme::{DEFAULT_THEME, Theme, ThemeSource, Themes};

/// Which browser-side capabilities a page asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub highlight: bool,
    pub math: bool,
    pub diagrams: bool,
}

impl Features {
    pub const fn all() -> Self {
        Self {
            highlight: true,
            math: true,
            diagrams: true,
        }
    }

    pub const fn any(&self) -> bool {
        self.highlight || self.math || self.diagrams
    }
}

/// Everything needed to turn markdown into a page.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Minified theme stylesheet.
    pub theme_css: String,
    pub features: Features,
    /// Render enabled features natively instead of in the browser.
    pub prerender: bool,
    /// Include the live-reload client.
    pub live: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme_css: String::new(),
            features: Features::default(),
            prerender: false,
            live: false,
        }
    }
}
