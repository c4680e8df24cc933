//! Actor Message Definitions
//!
//! ```text
//! FsActor --Changed--> RenderActor --Push--> WsActor
//!                           |
//!                           +--> output file (watch mode)
//! ```

use std::io::{Read, Write};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

// =============================================================================
// Shared State
// =============================================================================

/// The most recent successful render, as pushed to live clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub title: String,
    /// Markup for the root container.
    pub body: String,
}

/// Latest snapshot, read by HTTP workers and written by the render actor.
pub type Latest = Arc<ArcSwapOption<Snapshot>>;

pub fn latest() -> Latest {
    Arc::new(ArcSwapOption::empty())
}

/// A raw, already upgraded client connection.
pub trait ClientStream: Read + Write + Send {}

impl<T: Read + Write + Send> ClientStream for T {}

// =============================================================================
// RenderActor Messages
// =============================================================================

/// Messages to Render Actor
#[derive(Debug)]
pub enum RenderMsg {
    /// The watched file changed (or an initial render is requested)
    Changed,
    /// The watched file went away; the previous render is kept
    Removed,
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
pub enum WsMsg {
    /// Push a new body to every client
    Push(Arc<Snapshot>),
    /// Add an upgraded client
    AddClient(Box<dyn ClientStream>),
    /// Send close frames and stop
    Shutdown,
}

impl std::fmt::Debug for WsMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(snapshot) => f.debug_tuple("Push").field(&snapshot.title).finish(),
            Self::AddClient(_) => f.write_str("AddClient"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
