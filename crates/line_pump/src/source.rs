use std::io::{self, BufRead};

/// A blocking, line-oriented input that the worker thread pulls from.
///
/// `Ok(Some(line))` carries the next line exactly as read, terminator included.
/// `Ok(None)` means the source is exhausted and will never yield again.
pub trait LineSource: Send + 'static {
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Adapts any [`BufRead`] into a [`LineSource`] split on `\n`.
///
/// A trailing line without a terminator is returned as-is. Bytes that are not
/// valid UTF-8 surface as an [`io::ErrorKind::InvalidData`] error.
pub struct BufReadSource<R> {
    inner: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead + Send + 'static> LineSource for BufReadSource<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.inner.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}
