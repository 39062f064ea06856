//! Memoized at-most-once async initialization
//!
//! [`AsyncOnce`] backs the process-wide singletons (toolchain identity probe)
//! that must run their initializer exactly once no matter how many pipeline
//! computations are in flight. Unlike `OnceCell::get_or_try_init`, a failed
//! initializer is memoized too: every later caller observes the same shared
//! failure instead of re-running the probe. Retrying requires a process
//! restart, which keeps a long-running build internally consistent.

use std::sync::Arc;
use tokio::sync::OnceCell;

/// An async value computed at most once per process, failure included.
#[derive(Debug)]
pub struct AsyncOnce<T, E> {
    cell: OnceCell<std::result::Result<T, Arc<E>>>,
}

impl<T, E> Default for AsyncOnce<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> AsyncOnce<T, E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }
}

impl<T: Clone, E> AsyncOnce<T, E> {
    /// Get the memoized value, running `init` if this is the first caller.
    ///
    /// Concurrent callers all await the same in-flight initialization; the
    /// stored outcome (value or error) is shared with every subsequent call.
    pub async fn get_or_init<F, Fut>(&self, init: F) -> std::result::Result<T, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.cell
            .get_or_init(|| async { init().await.map_err(Arc::new) })
            .await
            .clone()
    }

    /// The resolved value, if initialization already succeeded.
    pub fn get(&self) -> Option<&T> {
        match self.cell.get() {
            Some(Ok(v)) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn concurrent_callers_share_one_initialization() {
        let once: AsyncOnce<u32, std::io::Error> = AsyncOnce::new();
        let calls = AtomicUsize::new(0);

        let init = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, std::io::Error>(7)
        };

        let (a, b, c) = tokio::join!(
            once.get_or_init(init),
            once.get_or_init(init),
            once.get_or_init(init),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.ok(), Some(7));
        assert_eq!(b.ok(), Some(7));
        assert_eq!(c.ok(), Some(7));
    }

    #[tokio::test]
    async fn failure_is_memoized_and_never_retried() {
        let once: AsyncOnce<u32, String> = AsyncOnce::new();
        let calls = AtomicUsize::new(0);

        let init = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>("probe failed".to_string())
        };

        let first = once.get_or_init(init).await;
        let second = once.get_or_init(init).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*first.unwrap_err(), "probe failed");
        assert_eq!(*second.unwrap_err(), "probe failed");
        assert!(once.get().is_none());
    }

    #[tokio::test]
    async fn get_returns_resolved_value() {
        let once: AsyncOnce<String, String> = AsyncOnce::new();
        assert!(once.get().is_none());

        let v = once
            .get_or_init(|| async { Ok::<_, String>("ready".to_string()) })
            .await;
        assert_eq!(v.as_deref().ok(), Some("ready"));
        assert_eq!(once.get().map(String::as_str), Some("ready"));
    }
}
