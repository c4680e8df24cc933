//! Render passes over a page.
//!
//! `render_all` runs three independent passes in order:
//!
//! 1. math: every `.language-math` element is typeset in place
//! 2. diagrams: every `code.language-mermaid` element is rendered by a
//!    spawned task, ids are `mermaid0..` and restart on every call
//! 3. highlight: the highlighter runs over the whole page
//!
//! A missing capability skips its pass. Diagram renders are not awaited by
//! `render_all`; the returned [`RenderPass`] can be settled to wait for
//! them. A diagram that finishes after the root container was replaced is
//! dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::capability::{Capabilities, DiagramConfig};
use super::page::{Page, PageError, Selector};
use crate::debug;

pub type SharedPage = Arc<Mutex<Page>>;

/// Anything that can re-render a page after its content changed.
pub trait RenderAll: Send + Sync {
    /// Must be called from within a tokio runtime.
    fn render_all(&self, page: &SharedPage) -> RenderPass;
}

/// How a single diagram render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramOutcome {
    Rendered,
    Failed,
    /// The page changed before the render finished.
    Stale,
}

/// Counts of settled diagram renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settled {
    pub rendered: usize,
    pub failed: usize,
    pub stale: usize,
}

/// Diagram renders still in flight for one `render_all` call.
#[derive(Debug, Default)]
pub struct RenderPass {
    diagrams: Vec<JoinHandle<DiagramOutcome>>,
}

impl RenderPass {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.diagrams.len()
    }

    /// Wait for every diagram render of this pass.
    pub async fn settle(self) -> Settled {
        let mut settled = Settled::default();
        for task in self.diagrams {
            match task.await {
                Ok(DiagramOutcome::Rendered) => settled.rendered += 1,
                Ok(DiagramOutcome::Stale) => settled.stale += 1,
                Ok(DiagramOutcome::Failed) | Err(_) => settled.failed += 1,
            }
        }
        settled
    }
}

pub struct RenderCoordinator {
    capabilities: Capabilities,
}

impl RenderCoordinator {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn math_pass(&self, page: &mut Page) {
        let Some(math) = &self.capabilities.math else {
            return;
        };
        let elements = match page.query_all(Selector::MATH) {
            Ok(elements) => elements,
            Err(e) => {
                debug!("render"; "math pass skipped: {}", e);
                return;
            }
        };

        let edits: Vec<_> = elements
            .into_iter()
            .filter_map(|element| {
                let display = element.has_class("math-display");
                match math.render(&element.text, display) {
                    Ok(markup) => Some((element.handle, markup)),
                    Err(e) => {
                        debug!("render"; "math `{}`: {}", element.text, e);
                        None
                    }
                }
            })
            .collect();
        if let Err(e) = page.set_inner_html_all(&edits) {
            debug!("render"; "math pass: {}", e);
        }
    }

    fn diagram_pass(&self, page: &SharedPage) -> Vec<JoinHandle<DiagramOutcome>> {
        let Some(diagrams) = &self.capabilities.diagrams else {
            return Vec::new();
        };
        diagrams.initialize(&DiagramConfig {
            start_on_load: false,
        });

        let elements = match page.lock().query_all(Selector::DIAGRAM) {
            Ok(elements) => elements,
            Err(e) => {
                debug!("render"; "diagram pass skipped: {}", e);
                return Vec::new();
            }
        };

        elements
            .into_iter()
            .enumerate()
            .map(|(n, element)| {
                let id = format!("mermaid{n}");
                let render = diagrams.render(&id, &element.text);
                let page = Arc::clone(page);

                tokio::spawn(async move {
                    let markup = match render.await {
                        Ok(markup) => markup,
                        Err(e) => {
                            debug!("render"; "diagram {}: {}", id, e);
                            return DiagramOutcome::Failed;
                        }
                    };
                    match page.lock().set_inner_html(&element.handle, &markup) {
                        Ok(()) => DiagramOutcome::Rendered,
                        Err(PageError::Stale) => {
                            debug!("render"; "diagram {} finished after the page changed", id);
                            DiagramOutcome::Stale
                        }
                        Err(e) => {
                            debug!("render"; "diagram {}: {}", id, e);
                            DiagramOutcome::Failed
                        }
                    }
                })
            })
            .collect()
    }

    fn highlight_pass(&self, page: &mut Page) {
        if let Some(highlighter) = &self.capabilities.highlighter
            && let Err(e) = highlighter.highlight_all(page)
        {
            debug!("render"; "highlight: {}", e);
        }
    }
}

impl RenderAll for RenderCoordinator {
    fn render_all(&self, page: &SharedPage) -> RenderPass {
        self.math_pass(&mut page.lock());
        let diagrams = self.diagram_pass(page);
        self.highlight_pass(&mut page.lock());
        RenderPass { diagrams }
    }
}

/// Render `body` with every available capability and wait for diagrams.
pub async fn prerender(body: &str, capabilities: Capabilities) -> String {
    let page: SharedPage = Arc::new(Mutex::new(Page::new(format!(
        "<div id=\"root\">{body}</div>"
    ))));

    let settled = RenderCoordinator::new(capabilities)
        .render_all(&page)
        .settle()
        .await;
    if settled.failed > 0 {
        debug!("render"; "{} diagram(s) failed to render", settled.failed);
    }

    let page = page.lock();
    page.inner_html(Selector::ROOT)
        .unwrap_or_else(|| body.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::capability::{
        CapabilityError, DiagramFuture, DiagramRenderer, Highlighter, MathRenderer,
    };
    use crate::utils::html::escape;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const DOC: &str = concat!(
        r#"<div id="root">"#,
        r#"<p><code class="language-math math-inline">x^2</code></p>"#,
        r#"<pre><code class="language-mermaid">graph TD; A--&gt;B</code></pre>"#,
        r#"<pre><code class="language-rust">let a = 1;</code></pre>"#,
        r#"</div>"#,
    );

    #[derive(Default)]
    struct StubMath {
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl MathRenderer for StubMath {
        fn render(&self, tex: &str, display: bool) -> Result<String, CapabilityError> {
            self.calls.lock().push((tex.to_owned(), display));
            Ok(format!("<span class=\"katex\">{}</span>", escape(tex)))
        }
    }

    #[derive(Default)]
    struct StubDiagrams {
        initialized: AtomicUsize,
        calls: Mutex<Vec<(String, String)>>,
        gate: Option<Arc<Notify>>,
    }

    impl DiagramRenderer for StubDiagrams {
        fn initialize(&self, config: &DiagramConfig) {
            assert!(!config.start_on_load);
            self.initialized.fetch_add(1, Ordering::SeqCst);
        }

        fn render(&self, id: &str, source: &str) -> DiagramFuture {
            self.calls.lock().push((id.to_owned(), source.to_owned()));
            let markup = format!("<svg id=\"{id}\"><text>{}</text></svg>", escape(source));
            let gate = self.gate.clone();
            Box::pin(async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                Ok(markup)
            })
        }
    }

    struct FailingDiagrams;

    impl DiagramRenderer for FailingDiagrams {
        fn initialize(&self, _: &DiagramConfig) {}

        fn render(&self, _: &str, _: &str) -> DiagramFuture {
            Box::pin(async { Err(CapabilityError::Render("parse error".into())) })
        }
    }

    #[derive(Default)]
    struct StubHighlighter {
        calls: AtomicUsize,
    }

    impl Highlighter for StubHighlighter {
        fn highlight_all(&self, page: &mut Page) -> Result<(), CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for block in page.query_all(Selector::CODE_BLOCK)? {
                if block.has_class("language-mermaid") || block.has_class("language-math") {
                    continue;
                }
                let markup = format!("<span class=\"hl\">{}</span>", escape(&block.text));
                page.set_inner_html(&block.handle, &markup)?;
            }
            Ok(())
        }
    }

    fn shared(html: &str) -> SharedPage {
        Arc::new(Mutex::new(Page::new(html)))
    }

    fn all_capabilities() -> (Capabilities, Arc<StubMath>, Arc<StubDiagrams>, Arc<StubHighlighter>) {
        let math = Arc::new(StubMath::default());
        let diagrams = Arc::new(StubDiagrams::default());
        let highlighter = Arc::new(StubHighlighter::default());
        let capabilities = Capabilities {
            math: Some(math.clone()),
            diagrams: Some(diagrams.clone()),
            highlighter: Some(highlighter.clone()),
        };
        (capabilities, math, diagrams, highlighter)
    }

    #[tokio::test]
    async fn test_all_capabilities_render_everything() {
        let (capabilities, math, diagrams, highlighter) = all_capabilities();
        let page = shared(DOC);

        let settled = RenderCoordinator::new(capabilities)
            .render_all(&page)
            .settle()
            .await;
        assert_eq!(settled.rendered, 1);

        let html = page.lock().html().to_owned();
        assert!(html.contains(r#"<span class="katex">x^2</span>"#));
        assert!(html.contains(r#"<svg id="mermaid0"><text>graph TD; A--&gt;B</text></svg>"#));
        assert!(html.contains(r#"<span class="hl">let a = 1;</span>"#));
        assert_eq!(math.calls.lock().as_slice(), [("x^2".to_owned(), false)]);
        assert_eq!(diagrams.initialized.load(Ordering::SeqCst), 1);
        assert_eq!(highlighter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_capabilities_skip_only_their_pass() {
        for mask in 0u8..8 {
            let (all, ..) = all_capabilities();
            let capabilities = Capabilities {
                math: (mask & 1 != 0).then(|| all.math.clone()).flatten(),
                diagrams: (mask & 2 != 0).then(|| all.diagrams.clone()).flatten(),
                highlighter: (mask & 4 != 0).then(|| all.highlighter.clone()).flatten(),
            };
            let page = shared(DOC);
            RenderCoordinator::new(capabilities)
                .render_all(&page)
                .settle()
                .await;

            let html = page.lock().html().to_owned();
            assert_eq!(html.contains("katex"), mask & 1 != 0, "mask {mask}");
            assert_eq!(html.contains("<svg"), mask & 2 != 0, "mask {mask}");
            assert_eq!(html.contains("class=\"hl\""), mask & 4 != 0, "mask {mask}");
        }
    }

    #[tokio::test]
    async fn test_no_capabilities_leaves_page_untouched() {
        let page = shared(DOC);
        let pass = RenderCoordinator::new(Capabilities::none()).render_all(&page);
        assert_eq!(pass.pending(), 0);
        assert_eq!(pass.settle().await, Settled::default());
        assert_eq!(page.lock().html(), DOC);
    }

    #[tokio::test]
    async fn test_render_all_is_idempotent() {
        let (capabilities, ..) = all_capabilities();
        let coordinator = RenderCoordinator::new(capabilities);
        let page = shared(DOC);

        coordinator.render_all(&page).settle().await;
        let once = page.lock().html().to_owned();
        coordinator.render_all(&page).settle().await;
        assert_eq!(page.lock().html(), once);
    }

    #[tokio::test]
    async fn test_distinct_diagram_ids_per_call() {
        let diagrams = Arc::new(StubDiagrams::default());
        let capabilities = Capabilities {
            diagrams: Some(diagrams.clone()),
            ..Capabilities::none()
        };
        let coordinator = RenderCoordinator::new(capabilities);
        let body: String = (0..4)
            .map(|i| format!("<pre><code class=\"language-mermaid\">graph {i}</code></pre>"))
            .collect();
        let page = shared(&format!("<div id=\"root\">{body}</div>"));

        let settled = coordinator.render_all(&page).settle().await;
        assert_eq!(settled.rendered, 4);

        let ids: Vec<String> = diagrams.calls.lock().iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(ids, ["mermaid0", "mermaid1", "mermaid2", "mermaid3"]);
        let sources: Vec<String> = diagrams.calls.lock().iter().map(|(_, s)| s.clone()).collect();
        assert_eq!(sources, ["graph 0", "graph 1", "graph 2", "graph 3"]);

        // The counter starts over on the next call.
        diagrams.calls.lock().clear();
        coordinator.render_all(&page).settle().await;
        assert_eq!(diagrams.calls.lock()[0].0, "mermaid0");
        assert_eq!(diagrams.initialized.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_display_math_flag() {
        let math = Arc::new(StubMath::default());
        let capabilities = Capabilities {
            math: Some(math.clone()),
            ..Capabilities::none()
        };
        let page = shared(
            r#"<div id="root"><code class="language-math math-display">\sum_i i</code></div>"#,
        );
        RenderCoordinator::new(capabilities).render_all(&page);
        assert_eq!(math.calls.lock().as_slice(), [(r"\sum_i i".to_owned(), true)]);
    }

    #[tokio::test]
    async fn test_render_all_returns_before_diagrams_finish() {
        let gate = Arc::new(Notify::new());
        let diagrams = Arc::new(StubDiagrams {
            gate: Some(gate.clone()),
            ..StubDiagrams::default()
        });
        let capabilities = Capabilities {
            diagrams: Some(diagrams),
            ..Capabilities::none()
        };
        let page = shared(DOC);

        let pass = RenderCoordinator::new(capabilities).render_all(&page);
        assert_eq!(pass.pending(), 1);
        assert!(!page.lock().html().contains("<svg"));

        gate.notify_one();
        assert_eq!(pass.settle().await.rendered, 1);
        assert!(page.lock().html().contains("<svg"));
    }

    #[tokio::test]
    async fn test_stale_diagram_is_dropped() {
        let gate = Arc::new(Notify::new());
        let diagrams = Arc::new(StubDiagrams {
            gate: Some(gate.clone()),
            ..StubDiagrams::default()
        });
        let capabilities = Capabilities {
            diagrams: Some(diagrams),
            ..Capabilities::none()
        };
        let page = shared(DOC);

        let pass = RenderCoordinator::new(capabilities).render_all(&page);
        page.lock().replace_root("<p>hello</p>").unwrap();
        gate.notify_one();

        let settled = pass.settle().await;
        assert_eq!(settled.stale, 1);
        assert_eq!(page.lock().inner_html(Selector::ROOT).as_deref(), Some("<p>hello</p>"));
    }

    #[tokio::test]
    async fn test_failed_diagram_leaves_source() {
        let capabilities = Capabilities {
            diagrams: Some(Arc::new(FailingDiagrams)),
            ..Capabilities::none()
        };
        let page = shared(DOC);
        let settled = RenderCoordinator::new(capabilities)
            .render_all(&page)
            .settle()
            .await;
        assert_eq!(settled.failed, 1);
        assert_eq!(page.lock().html(), DOC);
    }

    #[tokio::test]
    async fn test_prerender_returns_body() {
        let (capabilities, ..) = all_capabilities();
        let body = "<p><code class=\"language-math math-inline\">y</code></p>";
        let html = prerender(body, capabilities).await;
        assert_eq!(html, "<p><code class=\"language-math math-inline\"><span class=\"katex\">y</span></code></p>");
    }
}
