//! Formatting guard.
//!
//! A process-wide "format in progress" flag plus the set of paths currently
//! being formatted. At most one guarded format operation runs at a time, and
//! a path that is mid-format is never re-entered. Acquisition hands out a
//! [`GuardTicket`]; dropping the ticket releases both the flag and the path,
//! so every exit path of an operation releases the guard.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct GuardState {
    active: bool,
    paths: HashSet<PathBuf>,
}

/// Shared guard state. Cloning yields another handle to the same guard.
#[derive(Debug, Clone, Default)]
pub struct FormattingGuard {
    state: Arc<Mutex<GuardState>>,
}

impl FormattingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    // The lock is never held across an await or user code, so a poisoned
    // mutex still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Try to start a format operation for `path`.
    ///
    /// Returns `None` when any operation is already active or `path` is
    /// already being formatted.
    pub fn try_acquire(&self, path: &Path) -> Option<GuardTicket> {
        let mut state = self.lock();
        if state.active || state.paths.contains(path) {
            return None;
        }
        state.active = true;
        state.paths.insert(path.to_path_buf());
        Some(GuardTicket {
            guard: self.clone(),
            path: path.to_path_buf(),
        })
    }

    /// True while a guarded operation is running.
    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// True while `path` is being formatted.
    pub fn is_formatting(&self, path: &Path) -> bool {
        self.lock().paths.contains(path)
    }

    fn release(&self, path: &Path) {
        let mut state = self.lock();
        state.paths.remove(path);
        state.active = false;
    }
}

/// Proof of a held guard. Releases on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the ticket is dropped"]
pub struct GuardTicket {
    guard: FormattingGuard,
    path: PathBuf,
}

impl GuardTicket {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for GuardTicket {
    fn drop(&mut self) {
        self.guard.release(&self.path);
    }
}
