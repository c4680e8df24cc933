//! `--follow URL`: a headless live-reload client.
//!
//! Connects to a running live server, mirrors every pushed body into a
//! local page, renders it with the native capabilities and writes the
//! result after each push. Returns when the server ends the session.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, bail};
use humansize::{DECIMAL, format_size};
use parking_lot::Mutex;
use url::Url;

use super::Cli;
use super::render::output_options;
use crate::config::RenderConfig;
use crate::document::{FALLBACK_TITLE, browser_config, render_page};
use crate::embed::serve::WAITING_BODY;
use crate::logger::status_success;
use crate::output;
use crate::preview::{
    Capabilities, LiveReloadClient, NoWindow, Page, RenderCoordinator, TungsteniteSockets,
    native,
};
use crate::{debug, log};

pub fn follow(cli: &Cli, url: &Url, config: RenderConfig) -> Result<()> {
    let config = RenderConfig {
        prerender: true,
        live: false,
        ..config
    };
    let target = output_options(cli, config.clone()).target;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let capabilities = native::detect(config.features);
        debug!("follow"; "native capabilities: {}", capabilities.summary());

        let shell = mirror_shell(&config, &capabilities);
        let page = Arc::new(Mutex::new(Page::new(shell)));
        let renderer = Arc::new(RenderCoordinator::new(capabilities));

        let Some(mut client) = LiveReloadClient::connect(
            Some(&TungsteniteSockets),
            url,
            Arc::clone(&page),
            renderer,
            Arc::new(NoWindow),
        )?
        else {
            bail!("no socket transport available");
        };
        log!("follow"; "{} -> {}", url, target.describe());

        while let Some(pass) = client.next().await {
            let started = Instant::now();
            let settled = pass.settle().await;
            let html = page.lock().html().to_owned();
            output::write_bytes(&target, html.as_bytes())?;
            status_success(&format!(
                "mirrored {} ({} diagrams, {}ms)",
                format_size(html.len(), DECIMAL),
                settled.rendered,
                started.elapsed().as_millis()
            ));
        }

        log!("follow"; "session closed by server");
        Ok::<(), anyhow::Error>(())
    })
}

/// Page every push is mirrored into. Features the native capabilities
/// cannot render keep their browser library.
fn mirror_shell(config: &RenderConfig, capabilities: &Capabilities) -> String {
    render_page(
        WAITING_BODY,
        FALLBACK_TITLE,
        &browser_config(config, capabilities),
    )
}
