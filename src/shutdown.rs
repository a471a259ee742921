//! Save-at-exit support.
//!
//! Databases opened with `save_at_exit` are queued here. The first
//! registration installs a single `atexit` handler; when the process exits
//! normally (returning from `main` or calling [`std::process::exit`]) it saves
//! every queued database once. Signals and aborts skip it, so treat the exit
//! save as best-effort and call [`Database::save`] yourself for anything that
//! matters.

use crate::database::Database;
use crate::error::Result;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

static QUEUED: Lazy<Mutex<Vec<Arc<Database>>>> = Lazy::new(|| Mutex::new(Vec::new()));
static INSTALL: Once = Once::new();
static EXITED: AtomicBool = AtomicBool::new(false);

/// Queue `db` for the exit save. Queuing the same database twice is a no-op.
pub(crate) fn register(db: &Arc<Database>) {
    {
        let mut queued = QUEUED.lock();
        if queued.iter().any(|d| Arc::ptr_eq(d, db)) {
            return;
        }
        queued.push(Arc::clone(db));
    }
    INSTALL.call_once(|| {
        // SAFETY: `run_at_exit` is a plain `extern "C" fn()` that never unwinds.
        let rc = unsafe { libc::atexit(run_at_exit) };
        if rc != 0 {
            tracing::warn!(rc, "could not install exit handler, databases will not save at exit");
        }
    });
}

/// Number of databases queued for the exit save.
#[must_use]
pub fn queued() -> usize {
    QUEUED.lock().len()
}

/// Save every queued database now. All of them are attempted; failures are
/// logged and the first one is returned.
pub fn save_all() -> Result<()> {
    let snapshot: Vec<Arc<Database>> = QUEUED.lock().clone();
    let mut first_err = None;
    for db in snapshot {
        if let Err(e) = db.save() {
            tracing::warn!(path = %db.path().display(), error = %e, "save failed");
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

extern "C" fn run_at_exit() {
    if EXITED.swap(true, Ordering::SeqCst) {
        return;
    }
    // Unwinding across the C boundary is UB; swallow it here.
    let _ = std::panic::catch_unwind(save_all);
}
