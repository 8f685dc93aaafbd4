//! Single-slot debouncer for save-triggered formatting.
//!
//! One debouncer is shared by every document. Scheduling while a call is
//! pending cancels that call and restarts the delay window, so a burst of
//! saves across several documents runs only the last scheduled task.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Delay between the last save and the format it triggers.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct PendingTask {
    token: CancellationToken,
    path: PathBuf,
    generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<PendingTask>,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Schedule `task` for `path` after the delay, replacing any pending call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, path: PathBuf, task: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.lock();
            if let Some(previous) = slot.pending.take() {
                tracing::debug!(path = %previous.path.display(), "Debounced format superseded");
                previous.token.cancel();
            }
            slot.generation += 1;
            slot.pending = Some(PendingTask {
                token: token.clone(),
                path,
                generation: slot.generation,
            });
            slot.generation
        };

        let delay = self.delay;
        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    {
                        let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
                        if slot.pending.as_ref().map(|p| p.generation) == Some(generation) {
                            slot.pending = None;
                        }
                    }
                    task().await;
                }
            }
        })
    }

    /// Path of the call waiting for its delay to elapse, if any.
    pub fn pending(&self) -> Option<PathBuf> {
        self.lock().pending.as_ref().map(|p| p.path.clone())
    }

    pub fn is_pending_for(&self, path: &Path) -> bool {
        self.lock()
            .pending
            .as_ref()
            .is_some_and(|p| p.path == path)
    }

    /// Drop the pending call without running it.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().pending.take() {
            previous.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<PathBuf>>>, Arc<AtomicUsize>) {
        (Arc::new(Mutex::new(Vec::new())), Arc::new(AtomicUsize::new(0)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay() {
        let debouncer = Debouncer::default();
        let (ran, count) = recorder();

        let (ran2, count2) = (Arc::clone(&ran), Arc::clone(&count));
        let handle = debouncer.schedule(PathBuf::from("a.cmake"), move || async move {
            ran2.lock().unwrap().push(PathBuf::from("a.cmake"));
            count2.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(debouncer.pending(), Some(PathBuf::from("a.cmake")));

        handle.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.pending(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_cancels_previous() {
        let debouncer = Debouncer::default();
        let (ran, _) = recorder();

        let first_ran = Arc::clone(&ran);
        let first = debouncer.schedule(PathBuf::from("a.cmake"), move || async move {
            first_ran.lock().unwrap().push(PathBuf::from("a.cmake"));
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        let second_ran = Arc::clone(&ran);
        let second = debouncer.schedule(PathBuf::from("b.cmake"), move || async move {
            second_ran.lock().unwrap().push(PathBuf::from("b.cmake"));
        });
        assert!(debouncer.is_pending_for(Path::new("b.cmake")));

        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(*ran.lock().unwrap(), vec![PathBuf::from("b.cmake")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_restarts_window() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let (_, count) = recorder();
        let start = tokio::time::Instant::now();

        let c1 = Arc::clone(&count);
        let _ = debouncer.schedule(PathBuf::from("a.cmake"), move || async move {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(250)).await;

        let c2 = Arc::clone(&count);
        let handle = debouncer.schedule(PathBuf::from("a.cmake"), move || async move {
            c2.fetch_add(1, Ordering::SeqCst);
        });
        handle.await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() >= Duration::from_millis(550));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let debouncer = Debouncer::default();
        let (_, count) = recorder();

        let c = Arc::clone(&count);
        let handle = debouncer.schedule(PathBuf::from("a.cmake"), move || async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        handle.await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(debouncer.pending(), None);
    }
}
