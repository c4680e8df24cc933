//! Actor Coordinator - Wires up the Preview Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Wires up actors for the selected mode
//! - Queues the initial render
//! - Runs them concurrently

mod runtime;

pub use runtime::{spawn_actors, wait_for_shutdown};

use std::path::PathBuf;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::{Latest, RenderMsg, WsMsg};
use super::render::{Publish, RenderActor};
use super::ws::WsActor;
use crate::config::RenderConfig;
use crate::output::OutputOptions;

pub const CHANNEL_BUFFER: usize = 32;

/// What the actors do with each render.
pub enum Mode {
    /// Rewrite the output on every change
    Watch(OutputOptions),
    /// Push bodies to WebSocket clients. The sender half is shared with the
    /// HTTP server, which hands over upgraded connections.
    Live {
        config: RenderConfig,
        latest: Latest,
        ws_rx: mpsc::Receiver<WsMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
    },
}

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    file: PathBuf,
    mode: Mode,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(file: PathBuf, mode: Mode) -> Self {
        Self {
            file,
            mode,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        let (render_tx, render_rx) = mpsc::channel::<RenderMsg>(CHANNEL_BUFFER);

        let fs_actor = FsActor::new(&self.file, render_tx.clone())
            .with_context(|| format!("failed to watch {}", self.file.display()))?;

        let (publish, ws_actor) = match self.mode {
            Mode::Watch(options) => (Publish::Output(options), None),
            Mode::Live {
                config,
                latest,
                ws_rx,
                ws_tx,
            } => {
                let ws_actor = WsActor::new(ws_rx, latest.clone());
                (
                    Publish::Live {
                        config,
                        latest,
                        ws_tx,
                    },
                    Some(ws_actor),
                )
            }
        };
        let render_actor = RenderActor::new(render_rx, self.file, publish);

        // The watcher is already buffering; render what is on disk now.
        render_tx
            .send(RenderMsg::Changed)
            .await
            .context("render actor unavailable")?;

        crate::debug!("actor"; "start");
        runtime::run_actors(fs_actor, render_actor, ws_actor, render_tx, self.shutdown_rx).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
