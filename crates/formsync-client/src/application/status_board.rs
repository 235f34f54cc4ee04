//! Cancellable status message scheduler.
//!
//! The page has one status line.  A transient message runs a fade sequence
//! (see [`StatusTimings`]) on a Tokio task.  Showing a new message aborts the
//! previous message's task, and every timer step is additionally tagged with
//! the generation it belongs to, so a late wake-up of an old task is a no-op.
//!
//! # Runtime requirement
//!
//! [`StatusBoard::show_transient`] spawns onto the current Tokio runtime and
//! must be called from within one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use formsync_core::{StatusLine, StatusTimings};

/// The page's status line plus its (at most one) pending fade task.
pub struct StatusBoard {
    line: Arc<Mutex<StatusLine>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    timings: StatusTimings,
}

impl StatusBoard {
    pub fn new(timings: StatusTimings) -> Self {
        Self {
            line: Arc::new(Mutex::new(StatusLine::new())),
            pending: Mutex::new(None),
            timings,
        }
    }

    /// Shows `text` with no fade scheduled (e.g. a progress message that a
    /// later result message replaces).
    pub fn show_pending(&self, text: &str) {
        let mut pending = lock(&self.pending);
        cancel(&mut pending);
        lock(&self.line).show(text);
    }

    /// Shows `text` and schedules its fade-out and clear.
    pub fn show_transient(&self, text: &str) {
        let mut pending = lock(&self.pending);
        cancel(&mut pending);

        let generation = lock(&self.line).show(text);
        let line = Arc::clone(&self.line);
        let timings = self.timings;

        *pending = Some(tokio::spawn(async move {
            sleep(timings.display).await;
            lock(&line).begin_fade(generation);
            sleep(timings.clear_after_fade).await;
            if lock(&line).clear(generation) {
                debug!("status message {generation} cleared");
            }
        }));
    }

    /// Copy of the current status line.
    pub fn snapshot(&self) -> StatusLine {
        lock(&self.line).clone()
    }

    /// Current status text.
    pub fn text(&self) -> String {
        lock(&self.line).text().to_string()
    }
}

impl Drop for StatusBoard {
    fn drop(&mut self) {
        cancel(&mut lock(&self.pending));
    }
}

fn cancel(pending: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = pending.take() {
        handle.abort();
    }
}

/// Locks `m`, recovering the data if a previous holder panicked.  The
/// guarded values stay consistent across any single method call.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
