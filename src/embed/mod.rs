//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `serve` - Page shell and browser runtime (preview.js, socket.js)
//! - `themes` - Built-in stylesheets
//! - `cdn` - Script and style tags for browser-side libraries
//!
//! Scripts and stylesheets are minified by `build.rs` and read from
//! `OUT_DIR`.
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::PageVars;
//!
//! let html = PageVars { title: "Notes", ..vars }.render();
//! ```

pub mod serve {
    /// Standalone page shell.
    const PAGE_HTML: &str = include_str!("serve/page.html");

    /// Placeholder for the root container content.
    const BODY: &str = "__BODY__";

    /// Variables for page.html.
    pub struct PageVars<'a> {
        pub version: &'a str,
        pub title: &'a str,
        pub theme_css: &'a str,
        pub head: &'a str,
        pub body: &'a str,
        pub scripts: &'a str,
    }

    impl PageVars<'_> {
        /// Fill the page shell. Document text never goes through
        /// placeholder replacement.
        pub fn render(&self) -> String {
            match PAGE_HTML.split_once(BODY) {
                Some((before, after)) => {
                    let mut page = self.apply_shell(before);
                    page.push_str(self.body);
                    page.push_str(&self.apply_shell(after));
                    page
                }
                None => self.apply_shell(PAGE_HTML),
            }
        }

        fn apply_shell(&self, content: &str) -> String {
            content
                .replace("__VERSION__", self.version)
                .replace("__TITLE__", self.title)
                .replace("__THEME_CSS__", self.theme_css)
                .replace("__HEAD__", self.head)
                .replace("__SCRIPTS__", self.scripts)
        }
    }

    /// Capability detection and render passes, plus the live-reload client.
    pub const PREVIEW_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/preview.min.js"));

    /// `ReconnectingSocket` with bounded exponential backoff.
    pub const SOCKET_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/socket.min.js"));

    /// Body served before the first render in live mode.
    pub const WAITING_BODY: &str = "<p class=\"marky-waiting\">😴 Waiting for changes</p>";
}

pub mod themes {
    /// Built-in themes as `(name, minified css)`.
    pub const BUILTIN: &[(&str, &str)] = &[
        (
            "github",
            include_str!(concat!(env!("OUT_DIR"), "/github.min.css")),
        ),
        (
            "github-dark",
            include_str!(concat!(env!("OUT_DIR"), "/github-dark.min.css")),
        ),
        (
            "sepia",
            include_str!(concat!(env!("OUT_DIR"), "/sepia.min.css")),
        ),
    ];
}

pub mod cdn {
    pub const KATEX: &str = concat!(
        r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css">"#,
        "\n",
        r#"<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js"></script>"#,
    );

    pub const MERMAID: &str =
        r#"<script src="https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js"></script>"#;

    pub const HIGHLIGHT: &str = concat!(
        r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11.9.0/build/styles/github.min.css">"#,
        "\n",
        r#"<script defer src="https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11.9.0/build/highlight.min.js"></script>"#,
    );
}
