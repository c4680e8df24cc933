use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::protocol::{CloseFrame, Message};

use super::{Client, WsActor};

impl WsActor {
    pub(super) fn send_body(ws: &mut Client, body: &str) -> tungstenite::Result<()> {
        ws.send(Message::text(body))
    }

    /// Send `body` to every client, dropping those that fail.
    pub(super) fn broadcast(&mut self, body: &str) {
        let count = self.clients.len();
        if count == 0 {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        self.clients
            .retain_mut(|client| match Self::send_body(client, body) {
                Ok(()) => true,
                Err(e) => {
                    crate::debug!("ws"; "client disconnected: {}", e);
                    false
                }
            });
        crate::debug!("ws"; "pushed to {}/{} clients", self.clients.len(), count);
    }

    /// Close every client. Browsers take a server close as the end of the
    /// session and close their window.
    pub(super) fn close_all(&mut self) {
        for mut client in self.clients.drain(..) {
            let frame = CloseFrame {
                code: CloseCode::Normal,
                reason: "server shutting down".into(),
            };
            if client.close(Some(frame)).is_ok() {
                // Push out the queued close frame.
                let _ = client.flush();
            }
        }
    }
}
