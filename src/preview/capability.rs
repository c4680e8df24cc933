//! Optional rendering and transport capabilities.
//!
//! Every capability is injected explicitly. An absent capability disables
//! its feature and is never an error.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

use super::page::{Page, PageError};

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("render failed: {0}")]
    Render(String),

    #[error("`{0}` not found in PATH")]
    MissingTool(&'static str),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Typesets math notation into markup.
pub trait MathRenderer: Send + Sync {
    fn render(&self, tex: &str, display: bool) -> Result<String, CapabilityError>;
}

/// Diagram renderer configuration, applied once per render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramConfig {
    pub start_on_load: bool,
}

pub type DiagramFuture = Pin<Box<dyn Future<Output = Result<String, CapabilityError>> + Send>>;

/// Turns diagram source into markup, asynchronously.
pub trait DiagramRenderer: Send + Sync {
    fn initialize(&self, config: &DiagramConfig);

    /// `id` is unique among the diagrams of one render pass.
    fn render(&self, id: &str, source: &str) -> DiagramFuture;
}

/// Highlights every eligible code block of a page in place.
pub trait Highlighter: Send + Sync {
    fn highlight_all(&self, page: &mut Page) -> Result<(), CapabilityError>;
}

/// Events delivered by a reconnecting socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Message(String),
    /// Terminal: the server closed the session or reconnection gave up.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocketOptions {
    pub reconnect_interval_ms: u64,
    pub max_reconnect_interval_ms: u64,
    pub reconnect_decay: f64,
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for SocketOptions {
    fn default() -> Self {
        Self {
            reconnect_interval_ms: 1000,
            max_reconnect_interval_ms: 30_000,
            reconnect_decay: 1.5,
            max_reconnect_attempts: None,
        }
    }
}

/// Opens reconnecting connections.
pub trait SocketFactory: Send + Sync {
    fn open(
        &self,
        url: &Url,
        options: SocketOptions,
    ) -> Result<mpsc::Receiver<SocketEvent>, CapabilityError>;
}

/// Rendering capabilities available to a render pass.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub math: Option<Arc<dyn MathRenderer>>,
    pub diagrams: Option<Arc<dyn DiagramRenderer>>,
    pub highlighter: Option<Arc<dyn Highlighter>>,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    /// Short summary for log lines, e.g. `math, highlight`.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = [
            (self.math.is_some(), "math"),
            (self.diagrams.is_some(), "diagrams"),
            (self.highlighter.is_some(), "highlight"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect();

        if names.is_empty() {
            "none".to_owned()
        } else {
            names.join(", ")
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Capabilities({})", self.summary())
    }
}
