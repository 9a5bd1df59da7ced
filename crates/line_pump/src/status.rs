use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SourceFault;

/// Lifecycle of the worker behind an [`crate::AsyncLineReader`].
///
/// Moves strictly forward: `NotStarted -> Running -> {Finished, Failed, Panicked}`,
/// or `NotStarted -> SpawnFailed` when the worker thread could not be created.
#[derive(Debug, Clone, Default)]
pub enum WorkerStatus {
    #[default]
    NotStarted,
    Running,
    /// The source reported end-of-stream.
    Finished,
    /// The source failed; lines read before the fault are still queued.
    Failed(SourceFault),
    Panicked,
    /// The thread never started; the source was dropped with it.
    SpawnFailed,
}

impl WorkerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerStatus::Finished
                | WorkerStatus::Failed(_)
                | WorkerStatus::Panicked
                | WorkerStatus::SpawnFailed
        )
    }

    /// `true` only for a clean end-of-stream.
    pub fn is_clean(&self) -> bool {
        matches!(self, WorkerStatus::Finished)
    }
}

#[derive(Debug, Default)]
pub(crate) struct WorkerState {
    status: Mutex<WorkerStatus>,
    lines_read: AtomicUsize,
}

impl WorkerState {
    fn lock(&self) -> MutexGuard<'_, WorkerStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn status(&self) -> WorkerStatus {
        self.lock().clone()
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }

    pub(crate) fn set(&self, status: WorkerStatus) {
        *self.lock() = status;
    }

    pub(crate) fn record_line(&self) -> usize {
        self.lines_read.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn lines_read(&self) -> usize {
        self.lines_read.load(Ordering::Relaxed)
    }
}

/// Publishes the worker's terminal status when dropped.
///
/// Dropping without calling [`CompletionGuard::finish`] means the read loop
/// unwound, which is recorded as [`WorkerStatus::Panicked`].
pub(crate) struct CompletionGuard {
    state: Arc<WorkerState>,
    outcome: Option<Result<(), SourceFault>>,
}

impl CompletionGuard {
    pub(crate) fn new(state: Arc<WorkerState>) -> Self {
        Self {
            state,
            outcome: None,
        }
    }

    pub(crate) fn state(&self) -> &WorkerState {
        &self.state
    }

    pub(crate) fn finish(&mut self, outcome: Result<(), SourceFault>) {
        self.outcome = Some(outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let status = match self.outcome.take() {
            Some(Ok(())) => WorkerStatus::Finished,
            Some(Err(fault)) => WorkerStatus::Failed(fault),
            None => WorkerStatus::Panicked,
        };
        self.state.set(status);
    }
}
