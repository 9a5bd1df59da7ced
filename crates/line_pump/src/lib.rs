#![forbid(unsafe_code)]
//! Non-blocking consumption of blocking, line-oriented inputs.
//!
//! An [`AsyncLineReader`] owns one worker thread that calls
//! [`LineSource::read_line`] until end-of-stream and pushes every line,
//! terminator included, onto a [`LineQueue`]. The consumer never touches the
//! source; it polls:
//! - [`AsyncLineReader::drain`] pops whatever is queued right now and never waits.
//! - [`AsyncLineReader::eof`] turns `true` once the worker stopped and the queue is empty.
//! - [`AsyncLineReader::error`] tells a read fault apart from a clean end-of-stream.
//!
//! Dropping the reader joins the worker. There is no cancellation: to stop
//! early, close the underlying input from outside so the blocking read returns.
//!
//! The optional `tokio` feature adds [`AsyncLineReader::join_async`].

mod config;
mod error;
mod queue;
mod reader;
mod source;
mod status;

#[cfg(feature = "tokio")]
mod async_join;

pub use config::{ReaderConfig, DEFAULT_THREAD_NAME};
pub use error::{LineReaderError, SourceFault};
pub use queue::{FifoLineQueue, LineQueue};
pub use reader::{AsyncLineReader, AsyncLineReaderBuilder};
pub use source::{BufReadSource, LineSource};
pub use status::WorkerStatus;
