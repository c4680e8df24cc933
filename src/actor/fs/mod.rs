//! Watch actor.
//!
//! Watches the markdown file and sends debounced change notices to the
//! RenderActor. The parent directory is watched rather than the file so
//! that editors which save by renaming a temp file keep being followed.
//!
//! ```text
//! Watcher (dir) → Debouncer (filter + timing) → RenderMsg
//! ```

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::RenderMsg;

// Timing, merging and target filtering.
mod debouncer;
mod types;


use debouncer::Debouncer;
use types::ChangeKind;

/// Follows one file on disk.
pub struct FsActor {
    /// Raw events from the watcher thread
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Dropping it stops the watch
    _watcher: RecommendedWatcher,
    render_tx: mpsc::Sender<RenderMsg>,
    debouncer: Debouncer,
}

impl FsActor {
    /// Start watching immediately so that edits made during the initial
    /// render are buffered rather than lost.
    pub fn new(file: &Path, render_tx: mpsc::Sender<RenderMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let dir = watch_dir(file);
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        crate::debug!("watch"; "watching {}", dir.display());

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            render_tx,
            debouncer: Debouncer::new(file),
        })
    }

    /// Report changes until the RenderActor goes away or the watcher
    /// stops delivering events.
    pub async fn run(self) {
        let Self {
            notify_rx,
            _watcher,
            render_tx,
            mut debouncer,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        let bridge = std::thread::Builder::new()
            .name("marky-notify".into())
            .spawn(move || {
                for result in notify_rx {
                    let event = match result {
                        Ok(event) => event,
                        Err(e) => {
                            crate::log!("watch"; "watcher error: {e}");
                            continue;
                        }
                    };
                    if async_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = bridge {
            crate::log!("watch"; "failed to start watcher thread: {e}");
            return;
        }

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => match event {
                    Some(event) => debouncer.add_event(&event),
                    None => {
                        crate::log!("watch"; "watcher stopped, changes are no longer followed");
                        break;
                    }
                },
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    let Some(change) = debouncer.take_if_ready() else {
                        continue;
                    };
                    if render_tx.send(change_message(change)).await.is_err() {
                        break;
                    }
                }
            }
        }
        crate::debug!("watch"; "stopped");
    }
}

fn change_message(change: ChangeKind) -> RenderMsg {
    match change {
        ChangeKind::Created | ChangeKind::Modified => RenderMsg::Changed,
        ChangeKind::Removed => RenderMsg::Removed,
    }
}

/// Directory holding `file`; `.` for a bare file name.
fn watch_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
