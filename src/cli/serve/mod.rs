//! Live preview server.
//!
//! ```text
//! GET /  (Upgrade: websocket) → 101, stream handed to WsActor
//! GET /                       → page with the latest body
//! GET /<path>                 → static file next to the markdown file
//! ```

mod lifecycle;
mod path;
mod response;
mod upgrade;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};
use tokio::sync::mpsc;

use crate::actor::messages::{Latest, WsMsg, latest};
use crate::actor::{Coordinator, Mode, coordinator::CHANNEL_BUFFER, spawn_actors, wait_for_shutdown};
use crate::config::RenderConfig;
use crate::core::Hooks;
use crate::document::{FALLBACK_TITLE, render_page};
use crate::embed::serve::WAITING_BODY;
use crate::{debug, log};

/// Number of request worker threads
const REQUEST_WORKERS: usize = 4;

/// Everything a request worker needs.
struct ServeState {
    /// Directory of the markdown file, served for relative assets
    root: PathBuf,
    config: RenderConfig,
    latest: Latest,
    ws_tx: mpsc::Sender<WsMsg>,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    file: PathBuf,
    state: Arc<ServeState>,
    ws_rx: mpsc::Receiver<WsMsg>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the preview server for `file` without starting the request loop.
pub fn bind_server(file: &Path, port: u16, config: RenderConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register(Hooks {
        actors: shutdown_tx,
        server: Some(Arc::clone(&server)),
    });

    let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
    let state = Arc::new(ServeState {
        root: serve_root(file),
        config: RenderConfig {
            live: true,
            prerender: false,
            ..config
        },
        latest: latest(),
        ws_tx,
    });

    Ok(BoundServer {
        server,
        addr,
        file: file.to_path_buf(),
        state,
        ws_rx,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the actors and the request loop (blocking until Ctrl+C).
    pub fn run(self, open_browser: bool) -> Result<()> {
        let mode = Mode::Live {
            config: self.state.config.clone(),
            latest: Arc::clone(&self.state.latest),
            ws_rx: self.ws_rx,
            ws_tx: self.state.ws_tx.clone(),
        };
        let coordinator = Coordinator::new(self.file, mode).with_shutdown_signal(self.shutdown_rx);
        let actors = spawn_actors(coordinator).context("failed to start actors")?;

        let url = format!("http://{}", self.addr);
        log!("serve"; "{}", url);
        if open_browser && let Err(e) = crate::output::open(&url) {
            log!("warning"; "failed to open the page: {:#}", e);
        }

        run_request_loop(&self.server, &self.state)?;
        wait_for_shutdown(actors);
        Ok(())
    }
}

fn serve_root(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn run_request_loop(server: &Server, state: &Arc<ServeState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_WORKERS)
        .thread_name(|i| format!("marky-http-{i}"))
        .build()
        .context("failed to create request pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                debug!("serve"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if path::normalize_url(request.url()).is_empty() {
        if upgrade::is_upgrade(&request) {
            return upgrade::accept(request, &state.ws_tx);
        }
        return response::respond_page(request, current_page(state));
    }

    match path::resolve_path(request.url(), &state.root) {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request),
    }
}

/// Page shell around the latest body, or a placeholder before the first render.
fn current_page(state: &ServeState) -> String {
    match state.latest.load_full() {
        Some(snapshot) => render_page(&snapshot.body, &snapshot.title, &state.config),
        None => render_page(WAITING_BODY, FALLBACK_TITLE, &state.config),
    }
}
