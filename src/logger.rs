//! Terminal output.
//!
//! Everything goes to stderr so that `--stdout` output stays clean.
//!
//! - `log!("module"; ...)` prints a line behind a colored `[module]` tag
//! - `debug!("module"; ...)` does the same, only with `--verbose`
//! - `status_*` functions drive the status block of watch and live mode
//!
//! ```ignore
//! log!("render"; "wrote {} bytes", len);
//! debug!("ws"; "client connected (total: {})", count);
//! status_success("updated: notes.md (12ms)");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::io::{Write, stderr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set by `--verbose`.
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message behind a colored `[module]` tag.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`. Arguments are not evaluated
/// otherwise.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let tag = paint_tag(module);
    let mut err = stderr().lock();
    // A status line may still be on the current row.
    execute!(err, Clear(ClearType::UntilNewLine)).ok();
    writeln!(err, "{tag} {message}").ok();
    err.flush().ok();
}

fn paint_tag(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" | "live" => tag.bright_blue().bold().to_string(),
        "watch" | "follow" => tag.bright_green().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        "warning" => tag.bright_magenta().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status block
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Unchanged,
    Error,
}

/// The last render result, redrawn in place.
///
/// A long editing session leaves one block on screen instead of a
/// scrolling log. With `--verbose` the block is never redrawn so that
/// debug lines in between stay readable.
struct StatusBlock {
    /// Rows taken by the previous block
    rows: usize,
}

static STATUS: Mutex<StatusBlock> = parking_lot::const_mutex(StatusBlock { rows: 0 });

impl StatusBlock {
    fn show(&mut self, outcome: Outcome, message: &str) {
        let mut err = stderr().lock();

        if self.rows > 0 && !is_verbose() {
            #[allow(clippy::cast_possible_truncation)]
            execute!(
                err,
                cursor::MoveUp(self.rows as u16),
                Clear(ClearType::FromCursorDown)
            )
            .ok();
        }

        let stamp = format!("[{}]", clock()).dimmed().to_string();
        let line = match outcome {
            Outcome::Success => format!("{stamp} {} {message}", "✓".green()),
            Outcome::Error => format!("{stamp} {} {message}", "✗".red()),
            Outcome::Unchanged => format!("{stamp} {}", message.dimmed()),
        };
        writeln!(err, "{line}").ok();
        err.flush().ok();

        self.rows = rows(message);
    }
}

/// Terminal rows a status message takes.
fn rows(message: &str) -> usize {
    message.lines().count().max(1)
}

/// UTC wall clock as `HH:MM:SS`.
fn clock() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

pub fn status_success(message: &str) {
    STATUS.lock().show(Outcome::Success, message);
}

pub fn status_unchanged(message: &str) {
    STATUS.lock().show(Outcome::Unchanged, message);
}

/// Error summary with an optional detail on the following lines.
pub fn status_error(summary: &str, detail: &str) {
    let message = if detail.is_empty() {
        summary.to_owned()
    } else {
        format!("{summary}\n{detail}")
    };
    STATUS.lock().show(Outcome::Error, &message);
}
