use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe FIFO shared between the worker (push) and the consumer (pop).
///
/// Implementations synchronize internally; callers never lock around them.
pub trait LineQueue: Send + Sync + 'static {
    fn push(&self, line: String);
    fn try_pop(&self) -> Option<String>;
    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;
}

/// Default unbounded queue backing readers that were not handed one.
#[derive(Debug, Default)]
pub struct FifoLineQueue {
    lines: Mutex<VecDeque<String>>,
}

impl FifoLineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue that already holds `lines`, front first.
    pub fn seeded<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    // A panic while holding the lock can't leave the deque half-mutated, so
    // poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LineQueue for FifoLineQueue {
    fn push(&self, line: String) {
        self.lock().push_back(line);
    }

    fn try_pop(&self) -> Option<String> {
        self.lock().pop_front()
    }

    fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn pops_in_push_order() {
        let queue = FifoLineQueue::new();
        queue.push("a\n".to_string());
        queue.push("b\n".to_string());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_pop().as_deref(), Some("a\n"));
        assert_eq!(queue.try_pop().as_deref(), Some("b\n"));
        assert_eq!(queue.try_pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn seeded_queue_keeps_order() {
        let queue = FifoLineQueue::seeded(["x\n", "y\n"]);
        assert_eq!(queue.try_pop().as_deref(), Some("x\n"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn concurrent_push_and_pop_lose_nothing() {
        let queue = Arc::new(FifoLineQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..5_000 {
                    queue.push(format!("{i}\n"));
                }
            })
        };

        let mut seen = Vec::new();
        while seen.len() < 5_000 {
            if let Some(line) = queue.try_pop() {
                seen.push(line);
            }
        }
        producer.join().unwrap();

        let expected: Vec<String> = (0..5_000).map(|i| format!("{i}\n")).collect();
        assert_eq!(seen, expected);
        assert!(queue.is_empty());
    }
}
