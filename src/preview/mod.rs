//! Page rendering and live reload.
//!
//! The same contract the browser runtime (`embed/serve/preview.js`)
//! follows, expressed with injected capabilities so it runs natively too:
//!
//! - `RenderCoordinator` runs the math, diagram and highlight passes over a
//!   [`Page`]; any capability may be absent
//! - `LiveReloadClient` mirrors server pushes into the root container and
//!   re-renders, closing the host window when the session ends
//!
//! Native backends live in `native`; the headless `--follow` mode wires
//! them to a `TungsteniteSockets` connection.

mod capability;
mod client;
mod coordinator;
pub mod native;
mod page;
mod socket;
mod window;

pub use capability::Capabilities;
pub use client::LiveReloadClient;
pub use coordinator::{RenderCoordinator, prerender};
pub use page::Page;
pub use socket::TungsteniteSockets;
pub use window::NoWindow;
