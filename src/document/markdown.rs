//! Markdown to HTML fragment conversion.
//!
//! Math is emitted as source elements for the math pass:
//!
//! - `$x$` becomes `<code class="language-math math-inline">x</code>`
//! - `$$x$$` becomes `<code class="language-math math-display">x</code>`
//!
//! Fenced `mermaid` blocks keep the standard
//! `<pre><code class="language-mermaid">` shape.

use crate::utils::html::escape;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Title used when the document does not open with a heading.
pub const FALLBACK_TITLE: &str = "Document";

fn options(math: bool) -> Options {
    let mut options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM;
    if math {
        options |= Options::ENABLE_MATH;
    }
    options
}

/// Render markdown to an HTML fragment.
pub fn to_html(text: &str, math: bool) -> String {
    let parser = Parser::new_ext(text, options(math)).map(|event| match event {
        Event::InlineMath(tex) => Event::InlineHtml(math_element("math-inline", &tex)),
        Event::DisplayMath(tex) => Event::InlineHtml(math_element("math-display", &tex)),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn math_element(mode: &str, tex: &str) -> CowStr<'static> {
    format!("<code class=\"language-math {mode}\">{}</code>", escape(tex)).into()
}

/// Text of the heading the document starts with, if any.
pub fn title(text: &str) -> Option<String> {
    let mut events = Parser::new_ext(text, options(false));
    match events.next()? {
        Event::Start(Tag::Heading { .. }) => {}
        _ => return None,
    }

    let mut title = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(s) | Event::Code(s) => title.push_str(&s),
            Event::SoftBreak | Event::HardBreak => title.push(' '),
            _ => {}
        }
    }

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_leading_heading() {
        assert_eq!(title("# Notes\n\ntext").as_deref(), Some("Notes"));
        assert_eq!(title("## The `core` module").as_deref(), Some("The core module"));
        assert_eq!(title("Setext *title*\n===").as_deref(), Some("Setext title"));
    }

    #[test]
    fn test_title_requires_first_block() {
        assert_eq!(title("intro\n\n# Later"), None);
        assert_eq!(title(""), None);
        assert_eq!(title("#"), None);
    }

    #[test]
    fn test_inline_math_markup() {
        let html = to_html("Euler: $e^{i\\pi} < 0$", true);
        assert!(html.contains(r#"<code class="language-math math-inline">e^{i\pi} &lt; 0</code>"#));
    }

    #[test]
    fn test_display_math_markup() {
        let html = to_html("$$\n\\int_0^1 x\\,dx\n$$", true);
        assert!(html.contains(r#"<code class="language-math math-display">"#));
        assert!(html.contains("\\int_0^1"));
    }

    #[test]
    fn test_math_disabled_keeps_dollars() {
        let html = to_html("costs $5 and $6", false);
        assert!(html.contains("$5 and $6"));
        assert!(!html.contains("language-math"));
    }

    #[test]
    fn test_mermaid_block() {
        let html = to_html("```mermaid\ngraph TD; A-->B\n```", false);
        assert!(html.contains(r#"<pre><code class="language-mermaid">graph TD; A--&gt;B"#));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = to_html("| a |\n|---|\n| 1 |\n\n- [x] done\n\n~~gone~~", false);
        assert!(html.contains("<table>"));
        assert!(html.contains("checkbox"));
        assert!(html.contains("<del>gone</del>"));
    }
}
