//! # Disposables
//!
//! Anything a [`ResourceScope`](super::ResourceScope) can own. Disposal
//! consumes the resource, so the type system guarantees it happens at most
//! once per member.
//!
//! Stock implementations:
//! - `Subscription` (in `stream.rs`): stops notifications
//! - `tokio::task::JoinHandle` / `AbortHandle`: aborts the task (timers, pending work)
//! - [`from_fn`]: arbitrary cleanup closure

use std::fmt;

/// A disposal failure reported by a single scope member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposeError {
    message: String,
}

impl DisposeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DisposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispose failed: {}", self.message)
    }
}

impl std::error::Error for DisposeError {}

pub trait Disposable: Send {
    /// Release the resource. Called at most once.
    fn dispose(self: Box<Self>) -> Result<(), DisposeError>;
}

impl<T: Send + 'static> Disposable for tokio::task::JoinHandle<T> {
    fn dispose(self: Box<Self>) -> Result<(), DisposeError> {
        self.abort();
        Ok(())
    }
}

impl Disposable for tokio::task::AbortHandle {
    fn dispose(self: Box<Self>) -> Result<(), DisposeError> {
        self.abort();
        Ok(())
    }
}

/// Cleanup closure wrapped as a [`Disposable`].
pub struct FnDisposable<F> {
    cleanup: F,
}

impl<F> Disposable for FnDisposable<F>
where
    F: FnOnce() -> Result<(), DisposeError> + Send,
{
    fn dispose(self: Box<Self>) -> Result<(), DisposeError> {
        (self.cleanup)()
    }
}

/// Wrap a cleanup closure so it can be added to a scope.
pub fn from_fn<F>(cleanup: F) -> FnDisposable<F>
where
    F: FnOnce() -> Result<(), DisposeError> + Send,
{
    FnDisposable { cleanup }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fn_disposable_runs_cleanup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let member: Box<dyn Disposable> = Box::new(from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        assert!(member.dispose().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fn_disposable_reports_failure() {
        let member: Box<dyn Disposable> = Box::new(from_fn(|| Err(DisposeError::new("boom"))));
        let err = member.dispose().unwrap_err();
        assert_eq!(err.to_string(), "dispose failed: boom");
    }

    #[tokio::test]
    async fn test_join_handle_dispose_aborts_task() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        let abort = handle.abort_handle();
        let member: Box<dyn Disposable> = Box::new(handle);
        member.dispose().unwrap();
        for _ in 0..50 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }
}
