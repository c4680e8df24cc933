//! Process state shared across modes.

mod state;

pub use state::{Hooks, is_shutdown, register, setup_shutdown_handler};
