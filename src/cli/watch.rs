//! `--watch`: re-render the output file whenever the markdown file changes.

use anyhow::{Context, Result, anyhow, bail};
use crossbeam::channel;

use super::Cli;
use super::render::output_options;
use crate::actor::{Coordinator, Mode, spawn_actors};
use crate::config::RenderConfig;
use crate::core::Hooks;
use crate::log;
use crate::output::Target;

pub fn watch(cli: &Cli, config: RenderConfig) -> Result<()> {
    let Some(path) = &cli.path else {
        bail!("the watcher needs a file to watch");
    };
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }

    let options = output_options(cli, config);
    let Target::File(out) = &options.target else {
        bail!("watch mode writes to a file, not stdout");
    };
    log!("watch"; "{} -> {}", path.display(), out.display());

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register(Hooks {
        actors: shutdown_tx,
        server: None,
    });

    let coordinator =
        Coordinator::new(path.clone(), Mode::Watch(options)).with_shutdown_signal(shutdown_rx);
    spawn_actors(coordinator)
        .context("failed to start actors")?
        .join()
        .map_err(|_| anyhow!("watcher thread panicked"))
}
