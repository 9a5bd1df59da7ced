use std::io;
use std::sync::Arc;

use thiserror::Error;

/// A read failure that stopped the worker.
///
/// Cloneable so the same fault can be observed through
/// [`crate::AsyncLineReader::error`] and again from `join`.
#[derive(Debug, Clone, Error)]
#[error("failed to read line {line_number} from source: {source}")]
pub struct SourceFault {
    /// 1-based number of the line whose read failed.
    pub line_number: usize,
    #[source]
    pub source: Arc<io::Error>,
}

impl SourceFault {
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

#[derive(Debug, Error)]
pub enum LineReaderError {
    #[error("worker has already been started")]
    AlreadyStarted,
    #[error("failed to spawn worker thread `{thread_name}`: {source}")]
    Spawn {
        thread_name: String,
        #[source]
        source: io::Error,
    },
    #[error("worker never ran; its source was dropped when the thread failed to spawn")]
    SourceDropped,
    #[error(transparent)]
    SourceRead(#[from] SourceFault),
    #[error("line source panicked inside the worker thread")]
    WorkerPanicked,
    #[error("runtime shut down before the worker could be joined")]
    JoinCancelled,
}
