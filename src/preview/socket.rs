//! Reconnecting WebSocket client.
//!
//! Mirrors the browser `ReconnectingSocket`: after a dropped connection the
//! next attempt waits `interval * decay^attempts`, capped at the maximum.
//! A close frame from the server or running out of attempts ends the
//! session with [`SocketEvent::Closed`].

use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use tungstenite::protocol::Message;
use url::Url;

use super::capability::{CapabilityError, SocketEvent, SocketFactory, SocketOptions};
use crate::debug;

/// Channel capacity for received messages.
const EVENT_BUFFER: usize = 16;

/// Delay schedule between reconnection attempts.
#[derive(Debug, Clone)]
pub struct Backoff {
    options: SocketOptions,
    attempts: u32,
}

impl Backoff {
    pub const fn new(options: SocketOptions) -> Self {
        Self {
            options,
            attempts: 0,
        }
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.options.max_reconnect_attempts
            && self.attempts >= max
        {
            return None;
        }

        let exponent = i32::try_from(self.attempts).unwrap_or(i32::MAX);
        let scaled = self.options.reconnect_interval_ms as f64
            * self.options.reconnect_decay.powi(exponent);
        let capped = scaled.min(self.options.max_reconnect_interval_ms as f64);
        self.attempts = self.attempts.saturating_add(1);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(Duration::from_millis(capped as u64))
    }

    /// Called after a successful connection.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// `ws://host[:port]/` for a page served from `origin`.
pub fn socket_url(origin: &Url) -> Result<Url, CapabilityError> {
    let host = origin
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("page origin `{origin}` has no host"))?;
    let authority = match origin.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };
    Url::parse(&format!("ws://{authority}/")).map_err(|e| CapabilityError::Other(e.into()))
}

/// Socket factory backed by a blocking tungstenite client on its own thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteSockets;

impl SocketFactory for TungsteniteSockets {
    fn open(
        &self,
        url: &Url,
        options: SocketOptions,
    ) -> Result<mpsc::Receiver<SocketEvent>, CapabilityError> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let url = url.clone();

        thread::Builder::new()
            .name("marky-socket".into())
            .spawn(move || run_socket(&url, options, &tx))
            .map_err(|e| CapabilityError::Other(e.into()))?;

        Ok(rx)
    }
}

enum Session {
    /// Server sent a close frame.
    Closed,
    /// Connection dropped, try again.
    Dropped,
    /// Nobody is listening anymore.
    Abandoned,
}

fn run_socket(url: &Url, options: SocketOptions, tx: &mpsc::Sender<SocketEvent>) {
    let mut backoff = Backoff::new(options);

    loop {
        match tungstenite::connect(url.as_str()) {
            Ok((ws, _)) => {
                debug!("live"; "connected to {}", url);
                backoff.reset();
                match read_session(ws, tx) {
                    Session::Closed => break,
                    Session::Abandoned => return,
                    Session::Dropped => {}
                }
            }
            Err(e) => debug!("live"; "connect to {} failed: {}", url, e),
        }

        match backoff.next_delay() {
            Some(delay) => {
                debug!("live"; "reconnecting in {}ms (attempt {})", delay.as_millis(), backoff.attempts());
                thread::sleep(delay);
            }
            None => break,
        }
    }

    let _ = tx.blocking_send(SocketEvent::Closed);
}

fn read_session<S>(mut ws: tungstenite::WebSocket<S>, tx: &mpsc::Sender<SocketEvent>) -> Session
where
    S: std::io::Read + std::io::Write,
{
    loop {
        match ws.read() {
            Ok(Message::Text(text)) => {
                if tx.blocking_send(SocketEvent::Message(text.as_str().to_owned())).is_err() {
                    let _ = ws.close(None);
                    return Session::Abandoned;
                }
            }
            Ok(Message::Close(frame)) => {
                debug!("live"; "server closed the session: {:?}", frame);
                return Session::Closed;
            }
            Ok(_) => {}
            Err(e) => {
                debug!("live"; "connection lost: {}", e);
                return Session::Dropped;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(max_attempts: Option<u32>) -> SocketOptions {
        SocketOptions {
            reconnect_interval_ms: 1000,
            max_reconnect_interval_ms: 5000,
            reconnect_decay: 1.5,
            max_reconnect_attempts: max_attempts,
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let mut backoff = Backoff::new(options(None));
        let delays: Vec<u128> = (0..7)
            .map(|_| backoff.next_delay().unwrap().as_millis())
            .collect();
        assert_eq!(delays, [1000, 1500, 2250, 3375, 5000, 5000, 5000]);
    }

    #[test]
    fn test_backoff_attempt_limit() {
        let mut backoff = Backoff::new(options(Some(2)));
        assert!(backoff.next_delay().is_some());
        assert!(backoff.next_delay().is_some());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_backoff_reset() {
        let mut backoff = Backoff::new(options(None));
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.attempts(), 0);
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_socket_url_from_origin() {
        let origin = Url::parse("http://localhost:8080/notes.md?x=1").unwrap();
        assert_eq!(socket_url(&origin).unwrap().as_str(), "ws://localhost:8080/");

        let origin = Url::parse("http://127.0.0.1/").unwrap();
        assert_eq!(socket_url(&origin).unwrap().as_str(), "ws://127.0.0.1/");
    }

    #[test]
    fn test_socket_url_requires_host() {
        let origin = Url::parse("file:///tmp/notes.html").unwrap();
        assert!(socket_url(&origin).is_err());
    }

    #[test]
    fn test_unreachable_server_closes_after_attempts() {
        // Port 9 (discard) is practically never listening on loopback.
        let url = Url::parse("ws://127.0.0.1:9/").unwrap();
        let options = SocketOptions {
            reconnect_interval_ms: 1,
            max_reconnect_interval_ms: 2,
            reconnect_decay: 1.5,
            max_reconnect_attempts: Some(2),
        };
        let mut rx = TungsteniteSockets.open(&url, options).unwrap();
        assert_eq!(rx.blocking_recv(), Some(SocketEvent::Closed));
    }
}
