//! Render Actor
//!
//! Reads the markdown file on every change and publishes the result:
//!
//! - watch mode: the full page is written to the output target
//! - live mode: the body is stored as the latest snapshot and pushed to
//!   every WebSocket client
//!
//! Failed reads keep the previous render. Content identical to the last
//! render is skipped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use humansize::{DECIMAL, format_size};
use tokio::sync::mpsc;

use super::messages::{Latest, RenderMsg, Snapshot, WsMsg};
use crate::config::RenderConfig;
use crate::document::Document;
use crate::logger::{status_error, status_success, status_unchanged};
use crate::output::{self, OutputOptions};
use crate::utils::hash::Freshness;

/// Where renders go.
pub enum Publish {
    /// Write the full page on every change
    Output(OutputOptions),
    /// Push body fragments to live clients
    Live {
        config: RenderConfig,
        latest: Latest,
        ws_tx: mpsc::Sender<WsMsg>,
    },
}

pub struct RenderActor {
    rx: mpsc::Receiver<RenderMsg>,
    file: PathBuf,
    publish: Publish,
    freshness: Freshness,
}

impl RenderActor {
    pub fn new(rx: mpsc::Receiver<RenderMsg>, file: PathBuf, publish: Publish) -> Self {
        Self {
            rx,
            file,
            publish,
            freshness: Freshness::new(),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                RenderMsg::Changed => self.render().await,
                RenderMsg::Removed => {
                    status_error(
                        &format!("removed: {}", self.file.display()),
                        "keeping the previous render",
                    );
                }
                RenderMsg::Shutdown => {
                    crate::debug!("render"; "shutting down");
                    if let Publish::Live { ws_tx, .. } = &self.publish {
                        let _ = ws_tx.send(WsMsg::Shutdown).await;
                    }
                    break;
                }
            }
        }
    }

    async fn render(&mut self) {
        let name = self.file.display().to_string();
        let text = match std::fs::read_to_string(&self.file) {
            Ok(text) => text,
            Err(e) => {
                status_error(&format!("failed: {name}"), &e.to_string());
                return;
            }
        };

        if !self.freshness.update(text.as_bytes()) {
            status_unchanged(&format!("unchanged: {name}"));
            return;
        }

        let started = Instant::now();
        let document = Document::new(text);

        match &self.publish {
            Publish::Output(options) => match output::write(&document, options).await {
                Ok(bytes) => status_success(&written(
                    &name,
                    &options.target.describe(),
                    bytes,
                    started.elapsed().as_millis(),
                )),
                Err(e) => status_error(&format!("failed: {name}"), &format!("{e:#}")),
            },
            Publish::Live {
                config,
                latest,
                ws_tx,
            } => {
                let snapshot = Arc::new(Snapshot {
                    title: document.title(),
                    body: document.body(config),
                });
                latest.store(Some(Arc::clone(&snapshot)));
                if ws_tx.send(WsMsg::Push(snapshot)).await.is_err() {
                    crate::debug!("render"; "ws actor gone");
                }
                status_success(&format!(
                    "updated: {name} ({}ms)",
                    started.elapsed().as_millis()
                ));
            }
        }
    }
}

/// Status line for a written output, sizes in decimal units.
fn written(name: &str, target: &str, bytes: usize, millis: u128) -> String {
    format!(
        "{name} -> {target} ({}, {millis}ms)",
        format_size(bytes, DECIMAL)
    )
}
