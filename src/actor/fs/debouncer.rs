use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::types::ChangeKind;

/// Quiet time after the last event before a change is reported
pub(super) const DEBOUNCE: Duration = Duration::from_millis(300);
/// Minimum time between two reported changes
pub(super) const COOLDOWN: Duration = Duration::from_millis(800);
/// Sleep used while nothing is pending
const IDLE: Duration = Duration::from_secs(86400);

/// Collapses the event bursts editors produce on save into one change of
/// a single file. Timing and merging only, no I/O besides path
/// normalization.
pub(super) struct Debouncer {
    /// Normalized path of the watched file
    pub(super) target: PathBuf,
    pub(super) change: Option<ChangeKind>,
    /// Last relevant event of the open window
    pub(super) last_event: Option<Instant>,
    /// Last time a change was handed out
    pub(super) last_render: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(target: &Path) -> Self {
        Self {
            target: normalize_path(target),
            change: None,
            last_event: None,
            last_render: None,
        }
    }

    /// Feed a notify event. Events for other files in the directory and
    /// editor artifacts are ignored.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        let Some(kind) = ChangeKind::of(&event.kind) else {
            return;
        };

        // Atomic saves rename a temp file over the target; the target shows
        // up as one of the event's paths.
        let touches_target = event
            .paths
            .iter()
            .filter(|path| !is_temp_file(path))
            .any(|path| normalize_path(path) == self.target);
        if !touches_target {
            return;
        }

        crate::debug!("watch"; "event {}: {}", kind, self.target.display());
        self.change = match self.change {
            Some(earlier) => earlier.merge(kind),
            None => Some(kind),
        };
        self.last_event = Some(Instant::now());
    }

    /// When the open window may close: after the debounce and outside the
    /// cooldown. `None` without an open window.
    fn deadline(&self) -> Option<Instant> {
        let quiet = self.last_event? + DEBOUNCE;
        Some(match self.last_render {
            Some(rendered) => quiet.max(rendered + COOLDOWN),
            None => quiet,
        })
    }

    fn is_due(&self) -> bool {
        self.deadline()
            .is_some_and(|deadline| deadline <= Instant::now())
    }

    /// Close the window if it is due and hand out its change.
    ///
    /// A window whose events cancelled out closes without a change.
    pub(super) fn take_if_ready(&mut self) -> Option<ChangeKind> {
        if !self.is_due() {
            return None;
        }

        self.last_event = None;
        let change = self.change.take()?;
        self.last_render = Some(Instant::now());
        Some(change)
    }

    pub(super) fn is_ready(&self) -> bool {
        self.is_due() && self.change.is_some()
    }

    /// How long the actor may sleep before the window can close.
    pub(super) fn sleep_duration(&self) -> Duration {
        self.deadline().map_or(IDLE, |deadline| {
            deadline
                .saturating_duration_since(Instant::now())
                .max(Duration::from_millis(1))
        })
    }
}

/// Canonicalize the parent directory and keep the file name.
///
/// The file itself may not exist (removed, or mid-rename), so only the
/// directory is resolved. Falls back to the path as given.
pub(super) fn normalize_path(path: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    parent
        .canonicalize()
        .map_or_else(|_| path.to_path_buf(), |dir| dir.join(name))
}

/// Swap, backup and hidden files editors write next to the document.
pub(super) fn is_temp_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    const SUFFIXES: [&str; 7] = ["~", ".bak", ".bck", ".backup", ".swp", ".swo", ".tmp"];
    name.starts_with('.') || SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
