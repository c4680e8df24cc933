//! WebSocket Actor - Body Push
//!
//! Owns every upgraded client connection. The wire protocol is one way:
//! each text message is the complete markup for the page's root
//! container. Clients never send anything, so there is no reader; a
//! client that went away is dropped on the next failed send.
//!
//! ```text
//! RenderActor --[Push]--> WsActor --[text]--> Clients
//! HTTP upgrade --[AddClient]--^
//! ```

mod delivery;

use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Role;

use super::messages::{ClientStream, Latest, WsMsg};

type Client = WebSocket<Box<dyn ClientStream>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    clients: Vec<Client>,
    /// Sent to clients as soon as they connect
    latest: Latest,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>, latest: Latest) -> Self {
        Self {
            rx,
            clients: Vec::new(),
            latest,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Push(snapshot) => self.broadcast(&snapshot.body),
                WsMsg::AddClient(stream) => self.add_client(stream),
                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    self.close_all();
                    break;
                }
            }
        }
    }

    /// Adopt a stream whose HTTP upgrade has already been answered.
    fn add_client(&mut self, stream: Box<dyn ClientStream>) {
        let mut ws = WebSocket::from_raw_socket(stream, Role::Server, None);

        if let Some(snapshot) = self.latest.load_full()
            && let Err(e) = Self::send_body(&mut ws, &snapshot.body)
        {
            crate::debug!("ws"; "failed to send current body: {}", e);
            return;
        }

        self.clients.push(ws);
        crate::debug!("ws"; "client connected (total: {})", self.clients.len());
    }
}
