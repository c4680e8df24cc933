//! In-memory document the render passes operate on.
//!
//! The page is kept as an HTML string. Queries parse it with `tl` and walk
//! the tree in document order; edits splice the string directly. Elements
//! are addressed by `(selector, index, generation)` so an edit made after
//! the root container was replaced is detected instead of landing in the
//! new content.

use std::ops::Range;
use thiserror::Error;
use tl::{HTMLTag, NodeHandle, Parser, ParserOptions};

use crate::utils::html;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("failed to parse page: {0}")]
    Parse(String),

    #[error("no element matches `{0}`")]
    Missing(Selector),

    #[error("page changed since the element was queried")]
    Stale,

    #[error("edited elements overlap")]
    Overlap,
}

/// Minimal element selector: tag, class, id and direct parent tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    tag: Option<&'static str>,
    class: Option<&'static str>,
    id: Option<&'static str>,
    parent: Option<&'static str>,
}

impl Selector {
    /// `.language-math`
    pub const MATH: Self = Self::any().with_class("language-math");
    /// `code.language-mermaid`
    pub const DIAGRAM: Self = Self::tag("code").with_class("language-mermaid");
    /// `pre > code`
    pub const CODE_BLOCK: Self = Self::tag("code").inside("pre");
    /// `#root`
    pub const ROOT: Self = Self::any().with_id("root");

    pub const fn any() -> Self {
        Self {
            tag: None,
            class: None,
            id: None,
            parent: None,
        }
    }

    pub const fn tag(tag: &'static str) -> Self {
        Self {
            tag: Some(tag),
            ..Self::any()
        }
    }

    pub const fn with_class(self, class: &'static str) -> Self {
        Self {
            class: Some(class),
            ..self
        }
    }

    pub const fn with_id(self, id: &'static str) -> Self {
        Self { id: Some(id), ..self }
    }

    pub const fn inside(self, parent: &'static str) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    fn matches(&self, node: &NodeInfo, parent: Option<&str>) -> bool {
        self.tag.is_none_or(|t| node.tag.eq_ignore_ascii_case(t))
            && self.class.is_none_or(|c| node.classes.iter().any(|x| x == c))
            && self.id.is_none_or(|id| node.id.as_deref() == Some(id))
            && self
                .parent
                .is_none_or(|p| parent.is_some_and(|t| t.eq_ignore_ascii_case(p)))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(parent) = self.parent {
            write!(f, "{parent} > ")?;
        }
        if let Some(tag) = self.tag {
            f.write_str(tag)?;
        }
        if let Some(id) = self.id {
            write!(f, "#{id}")?;
        }
        if let Some(class) = self.class {
            write!(f, ".{class}")?;
        }
        if self.tag.is_none() && self.id.is_none() && self.class.is_none() {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// Stable address of a queried element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle {
    selector: Selector,
    index: usize,
    generation: u64,
}

/// Snapshot of a matching element taken at query time.
#[derive(Debug, Clone)]
pub struct Element {
    pub handle: ElementHandle,
    pub tag: String,
    pub classes: Vec<String>,
    /// Text content with entities decoded.
    pub text: String,
    pub inner_html: String,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

struct NodeInfo {
    tag: String,
    classes: Vec<String>,
    id: Option<String>,
}

struct Located {
    info: NodeInfo,
    text: String,
    inner: Range<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    html: String,
    generation: u64,
}

impl Page {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            generation: 0,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Bumped every time the root container is replaced.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all(&self, selector: Selector) -> Result<Vec<Element>, PageError> {
        let located = locate(&self.html, selector)?;
        Ok(located
            .into_iter()
            .enumerate()
            .map(|(index, found)| Element {
                handle: ElementHandle {
                    selector,
                    index,
                    generation: self.generation,
                },
                inner_html: self.html[found.inner.clone()].to_owned(),
                tag: found.info.tag,
                classes: found.info.classes,
                text: found.text,
            })
            .collect())
    }

    /// Inner markup of the first element matching `selector`.
    pub fn inner_html(&self, selector: Selector) -> Option<String> {
        let located = locate(&self.html, selector).ok()?;
        located
            .first()
            .map(|found| self.html[found.inner.clone()].to_owned())
    }

    /// Replace the content of a previously queried element.
    pub fn set_inner_html(&mut self, handle: &ElementHandle, markup: &str) -> Result<(), PageError> {
        if handle.generation != self.generation {
            return Err(PageError::Stale);
        }
        let located = locate(&self.html, handle.selector)?;
        let found = located
            .get(handle.index)
            .ok_or(PageError::Missing(handle.selector))?;
        self.html.replace_range(found.inner.clone(), markup);
        Ok(())
    }

    /// Replace the content of several queried elements at once.
    ///
    /// The page is parsed once per selector and the edits are spliced from
    /// the last element to the first, so earlier ranges stay valid. Nothing
    /// changes when any handle is stale, missing or overlaps another.
    pub fn set_inner_html_all(&mut self, edits: &[(ElementHandle, String)]) -> Result<(), PageError> {
        if edits.iter().any(|(handle, _)| handle.generation != self.generation) {
            return Err(PageError::Stale);
        }

        let mut parsed: Vec<(Selector, Vec<Located>)> = Vec::new();
        let mut splices = Vec::with_capacity(edits.len());
        for (handle, markup) in edits {
            let at = match parsed.iter().position(|(s, _)| *s == handle.selector) {
                Some(at) => at,
                None => {
                    parsed.push((handle.selector, locate(&self.html, handle.selector)?));
                    parsed.len() - 1
                }
            };
            let found = parsed[at]
                .1
                .get(handle.index)
                .ok_or(PageError::Missing(handle.selector))?;
            splices.push((found.inner.clone(), markup.as_str()));
        }

        splices.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
        if splices.windows(2).any(|pair| pair[1].0.end > pair[0].0.start) {
            return Err(PageError::Overlap);
        }
        for (range, markup) in splices {
            self.html.replace_range(range, markup);
        }
        Ok(())
    }

    /// Replace the whole content of the root container.
    pub fn replace_root(&mut self, markup: &str) -> Result<(), PageError> {
        let located = locate(&self.html, Selector::ROOT)?;
        let found = located.first().ok_or(PageError::Missing(Selector::ROOT))?;
        self.html.replace_range(found.inner.clone(), markup);
        self.generation += 1;
        Ok(())
    }
}

fn locate(source: &str, selector: Selector) -> Result<Vec<Located>, PageError> {
    let dom = tl::parse(source, ParserOptions::default()).map_err(|e| PageError::Parse(format!("{e:?}")))?;
    let parser = dom.parser();

    let mut found = Vec::new();
    for handle in dom.children() {
        walk(*handle, None, parser, source, selector, &mut found);
    }
    Ok(found)
}

fn walk(
    handle: NodeHandle,
    parent: Option<&str>,
    parser: &Parser<'_>,
    source: &str,
    selector: Selector,
    found: &mut Vec<Located>,
) {
    let Some(tag) = handle.get(parser).and_then(|node| node.as_tag()) else {
        return;
    };
    let info = node_info(tag);
    let name = info.tag.clone();

    if selector.matches(&info, parent)
        && let Some(inner) = inner_range(tag, parser, source)
    {
        let text = html::unescape(&tag.inner_text(parser)).into_owned();
        found.push(Located { info, text, inner });
    }

    for child in tag.children().top().iter() {
        walk(*child, Some(&name), parser, source, selector, found);
    }
}

fn node_info(tag: &HTMLTag<'_>) -> NodeInfo {
    let attrs = tag.attributes();
    let attr = |name: &str| {
        attrs
            .get(name)
            .flatten()
            .map(|value| value.as_utf8_str().into_owned())
    };
    NodeInfo {
        tag: tag.name().as_utf8_str().to_ascii_lowercase(),
        classes: attr("class")
            .map(|c| c.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default(),
        id: attr("id"),
    }
}

/// Byte range of the element's content inside `source`.
fn inner_range(tag: &HTMLTag<'_>, parser: &Parser<'_>, source: &str) -> Option<Range<usize>> {
    let (start, end) = tag.boundaries(parser);
    let bytes = source.as_bytes();
    // Normalize to an exclusive end whichever convention the parser uses.
    let end = if bytes.get(end) == Some(&b'>') { end + 1 } else { end };
    let outer = source.get(start..end)?;

    let open_end = start + open_tag_len(outer)?;
    let close_start = match outer.rfind("</") {
        Some(pos) if start + pos >= open_end => start + pos,
        _ => open_end,
    };
    Some(open_end..close_start)
}

/// Length of the opening tag, honouring quoted attribute values.
fn open_tag_len(outer: &str) -> Option<usize> {
    let mut quote = None;
    for (i, b) in outer.bytes().enumerate() {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if q == b => quote = None,
            (None, b'>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}
