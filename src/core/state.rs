//! Ctrl+C handling for watch and live mode.
//!
//! One-shot renders have nothing to wind down, so Ctrl+C exits at once.
//! Once watch or live mode registers its [`Hooks`], Ctrl+C instead wakes
//! the actor system and unblocks the preview server, and the mode returns
//! normally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::anyhow;
use crossbeam::channel::Sender;
use tiny_http::Server;

/// Ctrl+C has been received.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

static HOOKS: OnceLock<Hooks> = OnceLock::new();

/// What a running mode needs stopped.
pub struct Hooks {
    /// Wakes the actor system
    pub actors: Sender<()>,
    /// Preview server blocked in its request loop
    pub server: Option<Arc<Server>>,
}

impl Hooks {
    fn wind_down(&self) {
        let _ = self.actors.send(());
        if let Some(server) = &self.server {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        }
    }
}

/// Install the process-wide Ctrl+C handler. Call once, first thing.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);
        match HOOKS.get() {
            Some(hooks) => hooks.wind_down(),
            None => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow!("failed to set Ctrl+C handler: {e}"))
}

/// Register what Ctrl+C has to stop. Only the first registration counts;
/// a process runs a single mode.
pub fn register(hooks: Hooks) {
    if HOOKS.set(hooks).is_err() {
        crate::debug!("core"; "shutdown hooks already registered");
    }
}

/// Ctrl+C has been received. Relaxed: a request racing the flag is fine.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
