//! Host window hook.
//!
//! Browsers only let a script close a window it opened, so a closing page
//! first re-opens itself and then closes. Hosts without closable windows
//! implement both steps as no-ops.

pub trait WindowHost: Send + Sync {
    /// Navigate the current window to itself.
    fn open_self(&self);
    fn close(&self);
}

/// Host with no notion of windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWindow;

impl WindowHost for NoWindow {
    fn open_self(&self) {}

    fn close(&self) {}
}
