use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::Coordinator;
use crate::actor::fs::FsActor;
use crate::actor::messages::RenderMsg;
use crate::actor::render::RenderActor;
use crate::actor::ws::WsActor;

/// Run all actors concurrently.
pub(super) async fn run_actors(
    fs: FsActor,
    render: RenderActor,
    ws: Option<WsActor>,
    render_tx: mpsc::Sender<RenderMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let render_handle = tokio::spawn(render.run());
    let ws_handle = ws.map(|ws| tokio::spawn(ws.run()));
    let fs_handle = tokio::spawn(fs.run());

    match shutdown_rx {
        Some(rx) => loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        None => {
            let _ = fs_handle.await;
            return;
        }
    }

    // Render forwards the shutdown to ws, which closes its clients.
    let _ = render_tx.send(RenderMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), render_handle).await;
    if let Some(handle) = ws_handle {
        let _ = tokio::time::timeout(Duration::from_millis(500), handle).await;
    }
    fs_handle.abort();
}

/// Run the coordinator on its own runtime in a background thread.
pub fn spawn_actors(coordinator: Coordinator) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("marky-actors".into())
        .spawn(move || run_actor_system(coordinator))
}

fn run_actor_system(coordinator: Coordinator) {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            crate::log!("actor"; "failed to create runtime: {}", e);
            return;
        }
    };

    rt.block_on(async {
        if let Err(e) = coordinator.run().await {
            crate::log!("actor"; "error: {:#}", e);
        }
    });
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
