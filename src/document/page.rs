//! Full page assembly around a rendered body.

use crate::config::RenderConfig;
use crate::embed::cdn;
use crate::embed::serve::{PREVIEW_JS, PageVars, SOCKET_JS};

/// Tags for the browser-side libraries the page needs.
///
/// Features rendered ahead of time need nothing in the browser.
pub fn head_tags(config: &RenderConfig) -> String {
    if config.prerender {
        return String::new();
    }

    let features = config.features;
    [
        (features.math, cdn::KATEX),
        (features.diagrams, cdn::MERMAID),
        (features.highlight, cdn::HIGHLIGHT),
    ]
    .into_iter()
    .filter_map(|(enabled, tags)| enabled.then_some(tags))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Inline runtime scripts. The socket only ships with live pages.
pub fn scripts(config: &RenderConfig) -> String {
    let mut out = String::new();
    if config.live {
        out.push_str("<script>");
        out.push_str(SOCKET_JS);
        out.push_str("</script>\n");
    }
    out.push_str("<script>");
    out.push_str(PREVIEW_JS);
    out.push_str("</script>");
    out
}

/// Wrap `body` in the page shell.
pub fn render(body: &str, title: &str, config: &RenderConfig) -> String {
    let head = head_tags(config);
    let scripts = scripts(config);
    let title = crate::utils::html::escape(title);

    PageVars {
        version: env!("CARGO_PKG_VERSION"),
        title: &title,
        theme_css: &config.theme_css,
        head: &head,
        body,
        scripts: &scripts,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;

    fn config(features: Features, prerender: bool, live: bool) -> RenderConfig {
        RenderConfig {
            theme_css: "body{color:red}".into(),
            features,
            prerender,
            live,
        }
    }

    #[test]
    fn test_head_only_enabled_features() {
        let features = Features {
            math: true,
            ..Features::default()
        };
        let head = head_tags(&config(features, false, false));
        assert!(head.contains("katex"));
        assert!(!head.contains("mermaid"));
        assert!(!head.contains("highlight"));
    }

    #[test]
    fn test_prerender_needs_no_libraries() {
        let head = head_tags(&config(Features::all(), true, false));
        assert!(head.is_empty());
    }

    #[test]
    fn test_socket_only_when_live() {
        let plain = scripts(&config(Features::default(), false, false));
        let live = scripts(&config(Features::default(), false, true));
        assert!(!plain.contains(SOCKET_JS));
        assert!(live.contains(SOCKET_JS));
        assert!(plain.contains(PREVIEW_JS));
    }

    #[test]
    fn test_render_escapes_title() {
        let html = render("<p>x</p>", "a < b", &config(Features::default(), false, false));
        assert!(html.contains("<title>a &lt; b</title>"));
        assert!(html.contains("<style>body{color:red}</style>"));
        assert!(html.contains("<p>x</p>"));
    }
}
