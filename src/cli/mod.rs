//! Command-line interface module.

mod args;
pub mod follow;
pub mod render;
pub mod serve;
pub mod watch;

pub use args::{Cli, DEFAULT_PORT, print_completions};
