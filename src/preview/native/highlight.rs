//! Code highlighting with syntect.
//!
//! Each `pre > code` block is highlighted from its text content using the
//! syntax named by its `language-*` class (plain text when unknown). Math
//! and diagram sources are left alone. Output uses inline styles, so the
//! page needs no extra stylesheet.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::preview::capability::{CapabilityError, Highlighter};
use crate::preview::page::{Page, Selector};

const THEME: &str = "InspiredGitHub";

/// Classes whose blocks belong to other passes.
const SKIPPED: &[&str] = &["language-mermaid", "language-math"];

pub struct Syntect {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Syntect {
    pub fn new() -> Result<Self, CapabilityError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(THEME)
            .ok_or_else(|| CapabilityError::Render(format!("syntect theme `{THEME}` missing")))?;
        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    fn syntax_for(&self, classes: &[String]) -> &SyntaxReference {
        classes
            .iter()
            .filter_map(|class| class.strip_prefix("language-"))
            .find_map(|lang| self.syntaxes.find_syntax_by_token(lang))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn highlight(&self, code: &str, syntax: &SyntaxReference) -> Result<String, CapabilityError> {
        let mut lines = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 4);
        for line in LinesWithEndings::from(code) {
            let ranges = lines
                .highlight_line(line, &self.syntaxes)
                .map_err(|e| CapabilityError::Render(e.to_string()))?;
            let html = styled_line_to_highlighted_html(&ranges, IncludeBackground::No)
                .map_err(|e| CapabilityError::Render(e.to_string()))?;
            out.push_str(&html);
        }
        Ok(out)
    }
}

impl Highlighter for Syntect {
    fn highlight_all(&self, page: &mut Page) -> Result<(), CapabilityError> {
        let mut edits = Vec::new();
        for block in page.query_all(Selector::CODE_BLOCK)? {
            if SKIPPED.iter().any(|class| block.has_class(class)) {
                continue;
            }
            let syntax = self.syntax_for(&block.classes);
            edits.push((block.handle, self.highlight(&block.text, syntax)?));
        }
        Ok(page.set_inner_html_all(&edits)?)
    }
}
