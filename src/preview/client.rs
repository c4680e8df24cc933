//! Live-reload client.
//!
//! Listens on a reconnecting socket to the page's own origin. Every message
//! is the new content of the root container: it replaces the root and the
//! page is rendered again. When the session ends the host window is asked
//! to close, exactly once.
//!
//! ```text
//! Connected --[message]--> Connected (root replaced, render_all)
//! Connected --[closed]---> Closed    (open_self, close)
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use url::Url;

use super::capability::{CapabilityError, SocketEvent, SocketFactory, SocketOptions};
use super::coordinator::{RenderAll, RenderPass, SharedPage};
use super::socket::socket_url;
use super::window::WindowHost;
use crate::debug;

/// Upper bound for the reconnection delay.
pub const MAX_RECONNECT_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Connected,
    Closed,
}

pub struct LiveReloadClient {
    events: mpsc::Receiver<SocketEvent>,
    page: SharedPage,
    renderer: Arc<dyn RenderAll>,
    window: Arc<dyn WindowHost>,
    state: ClientState,
}

impl LiveReloadClient {
    /// Connect to `origin`. Without a socket factory there is nothing to do
    /// and `Ok(None)` is returned.
    pub fn connect(
        sockets: Option<&dyn SocketFactory>,
        origin: &Url,
        page: SharedPage,
        renderer: Arc<dyn RenderAll>,
        window: Arc<dyn WindowHost>,
    ) -> Result<Option<Self>, CapabilityError> {
        let Some(sockets) = sockets else {
            return Ok(None);
        };

        let url = socket_url(origin)?;
        let options = SocketOptions {
            max_reconnect_interval_ms: MAX_RECONNECT_INTERVAL_MS,
            ..SocketOptions::default()
        };
        let events = sockets.open(&url, options)?;
        debug!("live"; "listening on {}", url);

        Ok(Some(Self {
            events,
            page,
            renderer,
            window,
            state: ClientState::Connected,
        }))
    }

    pub const fn state(&self) -> ClientState {
        self.state
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    /// Handle the next socket event.
    ///
    /// Returns the render pass started by a message, or `None` once the
    /// session is over.
    pub async fn next(&mut self) -> Option<RenderPass> {
        if self.state == ClientState::Closed {
            return None;
        }

        match self.events.recv().await {
            Some(SocketEvent::Message(markup)) => Some(self.apply(&markup)),
            Some(SocketEvent::Closed) | None => {
                self.close();
                None
            }
        }
    }

    /// Process events until the session ends. Render passes are not awaited.
    pub async fn run(mut self) {
        while self.next().await.is_some() {}
    }

    fn apply(&self, markup: &str) -> RenderPass {
        if let Err(e) = self.page.lock().replace_root(markup) {
            debug!("live"; "could not replace root: {}", e);
        }
        self.renderer.render_all(&self.page)
    }

    fn close(&mut self) {
        if self.state == ClientState::Closed {
            return;
        }
        self.state = ClientState::Closed;
        debug!("live"; "session closed");
        self.window.open_self();
        self.window.close();
    }
}
