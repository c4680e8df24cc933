//! Actor System for Watch and Live Mode
//!
//! Message-passing concurrency:
//!
//! ```text
//! FsActor --> RenderActor --> WsActor
//! (watch)     (markdown)     (push)
//!                 |
//!                 +--> output file
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types and shared snapshot
//! - `fs` - File watcher with debouncing
//! - `render` - Markdown rendering and publishing
//! - `ws` - WebSocket push
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod render;
pub mod ws;

pub use coordinator::{Coordinator, Mode, spawn_actors, wait_for_shutdown};
