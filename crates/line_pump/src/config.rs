/// Name given to worker threads unless [`ReaderConfig::thread_name`] overrides it.
pub const DEFAULT_THREAD_NAME: &str = "line-pump";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReaderConfig {
    /// Spawn the worker as soon as the reader is built.
    pub autostart: bool,
    pub thread_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            autostart: true,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}
