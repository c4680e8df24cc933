//! marky - markdown to html with themes, math, diagrams and a live preview.

mod actor;
mod cli;
mod config;
mod core;
mod document;
mod embed;
mod logger;
mod output;
mod preview;
mod utils;

use anyhow::{Result, bail};
use clap::{ColorChoice, CommandFactory, Parser};
use cli::Cli;
use config::{Themes, paths};

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Some(shell) = cli.generator {
        cli::print_completions(shell, &mut Cli::command(), &mut std::io::stdout());
        return Ok(());
    }

    if cli.themes {
        for name in Themes::load(&paths::config_dir())?.names() {
            println!("{name}");
        }
        return Ok(());
    }

    if cli.where_config {
        println!("{}", paths::config_dir().display());
        return Ok(());
    }

    let config = cli::render::render_config(&cli)?;

    if let Some(url) = &cli.follow {
        return cli::follow::follow(&cli, url, config);
    }

    if cli.live {
        let Some(path) = &cli.path else {
            bail!("live preview needs a file to watch");
        };
        return cli::serve::bind_server(path, cli.port, config)?.run(true);
    }

    if cli.watch {
        return cli::watch::watch(&cli, config);
    }

    cli::render::render_once(&cli, config)
}
