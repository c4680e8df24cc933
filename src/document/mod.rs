//! Markdown documents and the pages built from them.
//!
//! ```text
//! text --markdown--> body fragment --[prerender]--> page shell
//! ```

mod markdown;
mod page;

pub use markdown::FALLBACK_TITLE;

use crate::config::{Features, RenderConfig};
use crate::preview::{self, Capabilities};

#[derive(Debug, Clone)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Leading heading, or [`FALLBACK_TITLE`].
    pub fn title(&self) -> String {
        markdown::title(&self.text).unwrap_or_else(|| FALLBACK_TITLE.to_owned())
    }

    /// Root container content, before any render pass.
    pub fn body(&self, config: &RenderConfig) -> String {
        markdown::to_html(&self.text, config.features.math)
    }

    /// Complete page, rendered in the browser.
    pub fn render(&self, config: &RenderConfig) -> String {
        page::render(&self.body(config), &self.title(), config)
    }

    /// Complete page with enabled features rendered natively.
    ///
    /// Features without a native backend keep their browser library.
    pub async fn render_prerendered(&self, config: &RenderConfig, capabilities: Capabilities) -> String {
        let page_config = browser_config(config, &capabilities);
        let body = preview::prerender(&self.body(config), capabilities).await;
        page::render(&body, &self.title(), &page_config)
    }
}

/// Page settings for a body already rendered with `capabilities`: library
/// tags only for the enabled features that had no native backend.
pub fn browser_config(config: &RenderConfig, capabilities: &Capabilities) -> RenderConfig {
    RenderConfig {
        features: browser_features(config.features, capabilities),
        prerender: false,
        ..config.clone()
    }
}

fn browser_features(features: Features, capabilities: &Capabilities) -> Features {
    Features {
        math: features.math && capabilities.math.is_none(),
        diagrams: features.diagrams && capabilities.diagrams.is_none(),
        highlight: features.highlight && capabilities.highlighter.is_none(),
    }
}

/// Page shell around an already rendered body.
pub fn render_page(body: &str, title: &str, config: &RenderConfig) -> String {
    page::render(body, title, config)
}
