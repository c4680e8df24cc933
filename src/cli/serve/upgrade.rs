//! WebSocket upgrade on the page's own origin.
//!
//! The handshake is answered here; the raw stream is then owned by the
//! `WsActor`, which speaks the WebSocket protocol over it.

use anyhow::{Result, anyhow};
use tiny_http::{Request, Response, StatusCode};
use tokio::sync::mpsc;

use super::response::{make_header, respond_bad_request};
use crate::actor::messages::{ClientStream, WsMsg};

/// Value of a request header, matched case-insensitively.
fn header<'r>(request: &'r Request, name: &'static str) -> Option<&'r str> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str())
}

/// Does the request ask for a WebSocket?
pub fn is_upgrade(request: &Request) -> bool {
    header(request, "Upgrade").is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

/// Complete the handshake and hand the stream to the WsActor.
pub fn accept(request: Request, ws_tx: &mpsc::Sender<WsMsg>) -> Result<()> {
    let Some(key) = header(&request, "Sec-WebSocket-Key").map(str::to_owned) else {
        return respond_bad_request(request, "missing Sec-WebSocket-Key");
    };

    let accept = tungstenite::handshake::derive_accept_key(key.trim().as_bytes());
    let response = Response::new_empty(StatusCode(101))
        .with_header(make_header("Upgrade", "websocket")?)
        .with_header(make_header("Connection", "Upgrade")?)
        .with_header(make_header("Sec-WebSocket-Accept", &accept)?);

    let stream: Box<dyn ClientStream> = Box::new(request.upgrade("websocket", response));
    ws_tx
        .blocking_send(WsMsg::AddClient(stream))
        .map_err(|_| anyhow!("ws actor unavailable"))
}
