use ::tokio::task::JoinError;

use crate::error::LineReaderError;
use crate::queue::LineQueue;
use crate::reader::AsyncLineReader;
use crate::source::LineSource;

impl<S: LineSource, Q: LineQueue> AsyncLineReader<S, Q> {
    /// [`AsyncLineReader::join`] for async callers; the blocking join runs on
    /// tokio's blocking pool instead of stalling the runtime.
    ///
    /// Fails with [`LineReaderError::JoinCancelled`] if the runtime shuts down
    /// before the blocking join ran.
    pub async fn join_async(self) -> Result<S, LineReaderError> {
        match ::tokio::task::spawn_blocking(move || self.join()).await {
            Ok(joined) => joined,
            Err(err) => Err(join_failure(err)),
        }
    }
}

fn join_failure(err: JoinError) -> LineReaderError {
    if err.is_panic() {
        LineReaderError::WorkerPanicked
    } else {
        LineReaderError::JoinCancelled
    }
}

#[cfg(test)]
mod tests {
    use std::future;
    use std::io;

    use super::join_failure;
    use crate::{AsyncLineReader, BufReadSource, LineReaderError};

    #[tokio::test]
    async fn join_async_hands_back_the_source() {
        let reader =
            AsyncLineReader::new(BufReadSource::new(io::Cursor::new(b"a\nb\n".to_vec()))).unwrap();
        let source = reader.join_async().await.unwrap();
        assert_eq!(source.get_ref().position(), 4);
    }

    #[tokio::test]
    async fn join_async_reports_source_fault() {
        struct Broken;

        impl crate::LineSource for Broken {
            fn read_line(&mut self) -> io::Result<Option<String>> {
                Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes"))
            }
        }

        let reader = AsyncLineReader::new(Broken).unwrap();
        match reader.join_async().await {
            Err(LineReaderError::SourceRead(fault)) => assert_eq!(fault.line_number, 1),
            other => panic!("unexpected join result {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn cancelled_join_is_not_reported_as_panic() {
        let task = tokio::spawn(future::pending::<()>());
        task.abort();
        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(matches!(join_failure(err), LineReaderError::JoinCancelled));
    }

    #[tokio::test]
    async fn panicked_join_is_reported_as_panic() {
        let err = tokio::task::spawn_blocking(|| panic!("blocking task failed"))
            .await
            .unwrap_err();
        assert!(err.is_panic());
        assert!(matches!(join_failure(err), LineReaderError::WorkerPanicked));
    }
}
