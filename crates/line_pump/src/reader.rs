use std::io::{self, BufReader, Read};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use crate::config::ReaderConfig;
use crate::error::{LineReaderError, SourceFault};
use crate::queue::{FifoLineQueue, LineQueue};
use crate::source::{BufReadSource, LineSource};
use crate::status::{CompletionGuard, WorkerState, WorkerStatus};

type WorkerFn<S> = Box<dyn FnOnce() -> S + Send + 'static>;

/// Reads lines from a blocking [`LineSource`] on a dedicated thread and queues
/// them for a consumer that only ever polls.
///
/// The reader joins its worker when dropped, so a reader held in a scope never
/// leaves background work running past that scope.
///
/// ```no_run
/// use line_pump::AsyncLineReader;
///
/// # fn main() -> Result<(), line_pump::LineReaderError> {
/// let reader = AsyncLineReader::from_reader(std::io::stdin())?;
/// while !reader.eof() {
///     for line in reader.drain() {
///         print!("{line}");
///     }
///     // do other work
/// }
/// # Ok(())
/// # }
/// ```
pub struct AsyncLineReader<S: LineSource, Q: LineQueue = FifoLineQueue> {
    source: Option<S>,
    queue: Arc<Q>,
    state: Arc<WorkerState>,
    handle: Option<JoinHandle<S>>,
    thread_name: String,
}

impl<S: LineSource> AsyncLineReader<S> {
    /// Starts reading `source` immediately into a private queue.
    pub fn new(source: S) -> Result<Self, LineReaderError> {
        Self::builder(source).build()
    }

    pub fn builder(source: S) -> AsyncLineReaderBuilder<S> {
        AsyncLineReaderBuilder {
            source,
            queue: Arc::new(FifoLineQueue::new()),
            config: ReaderConfig::default(),
        }
    }
}

impl<R: Read + Send + 'static> AsyncLineReader<BufReadSource<BufReader<R>>> {
    /// Starts reading lines from any byte reader (file, pipe, stdin).
    pub fn from_reader(reader: R) -> Result<Self, LineReaderError> {
        Self::new(BufReadSource::new(BufReader::new(reader)))
    }
}

impl<S: LineSource, Q: LineQueue> AsyncLineReader<S, Q> {
    /// Spawns the worker thread.
    ///
    /// Fails with [`LineReaderError::AlreadyStarted`] on every call after the
    /// first; the worker never runs twice. If the thread could not be spawned
    /// the source is gone and later calls fail with
    /// [`LineReaderError::SourceDropped`].
    pub fn start(&mut self) -> Result<(), LineReaderError> {
        self.start_with(|builder, worker| builder.spawn(worker))
    }

    fn start_with<F>(&mut self, spawn: F) -> Result<(), LineReaderError>
    where
        F: FnOnce(thread::Builder, WorkerFn<S>) -> io::Result<JoinHandle<S>>,
    {
        let Some(source) = self.source.take() else {
            return Err(match self.state.status() {
                WorkerStatus::SpawnFailed => LineReaderError::SourceDropped,
                _ => LineReaderError::AlreadyStarted,
            });
        };

        // Set before spawning so a worker that finishes instantly can't have
        // its terminal status overwritten.
        self.state.set(WorkerStatus::Running);
        let queue = Arc::clone(&self.queue);
        let state = Arc::clone(&self.state);
        let worker: WorkerFn<S> = Box::new(move || run_worker(source, queue, state));
        let builder = thread::Builder::new().name(self.thread_name.clone());

        match spawn(builder, worker) {
            Ok(handle) => {
                debug!(thread = %self.thread_name, "line reader worker started");
                self.handle = Some(handle);
                Ok(())
            }
            Err(source) => {
                warn!(
                    thread = %self.thread_name,
                    error = %source,
                    "failed to spawn line reader worker"
                );
                self.state.set(WorkerStatus::SpawnFailed);
                Err(LineReaderError::Spawn {
                    thread_name: self.thread_name.clone(),
                    source,
                })
            }
        }
    }

    /// `true` once the worker has stopped and every queued line was drained.
    pub fn eof(&self) -> bool {
        // Status first: the worker publishes it after its last push, so an
        // empty queue observed afterwards really is the end.
        self.state.is_terminal() && self.queue.is_empty()
    }

    /// Pops every line currently queued without waiting for more.
    pub fn drain(&self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.queue.try_pop() {
            lines.push(line);
        }
        lines
    }

    pub fn status(&self) -> WorkerStatus {
        self.state.status()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state.status(), WorkerStatus::Running)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// The fault that stopped the worker, if it did not reach a clean end-of-stream.
    pub fn error(&self) -> Option<LineReaderError> {
        match self.state.status() {
            WorkerStatus::Failed(fault) => Some(LineReaderError::SourceRead(fault)),
            WorkerStatus::Panicked => Some(LineReaderError::WorkerPanicked),
            WorkerStatus::SpawnFailed => Some(LineReaderError::SourceDropped),
            _ => None,
        }
    }

    /// Number of lines the worker has pushed so far.
    pub fn lines_read(&self) -> usize {
        self.state.lines_read()
    }

    pub fn queue(&self) -> &Arc<Q> {
        &self.queue
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Blocks until the worker is done and hands the source back.
    ///
    /// An unstarted reader returns its source untouched. Lines still queued
    /// remain reachable through any other handle to the queue.
    pub fn join(mut self) -> Result<S, LineReaderError> {
        if let Some(source) = self.source.take() {
            return Ok(source);
        }
        let Some(handle) = self.handle.take() else {
            return Err(LineReaderError::SourceDropped);
        };

        let source = handle
            .join()
            .map_err(|_| LineReaderError::WorkerPanicked)?;
        match self.state.status() {
            WorkerStatus::Failed(fault) => Err(fault.into()),
            _ => Ok(source),
        }
    }
}

impl<S: LineSource, Q: LineQueue> Drop for AsyncLineReader<S, Q> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!(thread = %self.thread_name, "joining line reader worker");
            if handle.join().is_err() {
                warn!(thread = %self.thread_name, "line reader worker panicked");
            }
        }
    }
}

fn run_worker<S: LineSource, Q: LineQueue>(
    mut source: S,
    queue: Arc<Q>,
    state: Arc<WorkerState>,
) -> S {
    let mut guard = CompletionGuard::new(state);
    loop {
        match source.read_line() {
            Ok(Some(line)) if !line.is_empty() => {
                queue.push(line);
                guard.state().record_line();
            }
            Ok(_) => {
                debug!(
                    lines = guard.state().lines_read(),
                    "line source reached end of stream"
                );
                guard.finish(Ok(()));
                break;
            }
            Err(err) => {
                let fault = SourceFault {
                    line_number: guard.state().lines_read() + 1,
                    source: Arc::new(err),
                };
                warn!(
                    line_number = fault.line_number,
                    error = %fault.source,
                    "line source failed; worker stopping"
                );
                guard.finish(Err(fault));
                break;
            }
        }
    }
    source
}

/// Configures an [`AsyncLineReader`] before its worker starts.
pub struct AsyncLineReaderBuilder<S, Q = FifoLineQueue> {
    source: S,
    queue: Arc<Q>,
    config: ReaderConfig,
}

impl<S: LineSource, Q: LineQueue> AsyncLineReaderBuilder<S, Q> {
    /// Pushes into `queue` instead of a private one. The queue is used as-is,
    /// including anything already in it.
    pub fn queue<Q2: LineQueue>(self, queue: Arc<Q2>) -> AsyncLineReaderBuilder<S, Q2> {
        AsyncLineReaderBuilder {
            source: self.source,
            queue,
            config: self.config,
        }
    }

    pub fn autostart(mut self, autostart: bool) -> Self {
        self.config.autostart = autostart;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    pub fn config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<AsyncLineReader<S, Q>, LineReaderError> {
        let mut reader = AsyncLineReader {
            source: Some(self.source),
            queue: self.queue,
            state: Arc::new(WorkerState::default()),
            handle: None,
            thread_name: self.config.thread_name,
        };
        if self.config.autostart {
            reader.start()?;
        }
        Ok(reader)
    }
}
