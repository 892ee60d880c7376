//! # Commands
//!
//! An async action a view exposes to the user (button tap, list selection).
//!
//! ```text
//!   execute(arg)
//!     ├─ gate closed / already running  → Err, body never runs
//!     ├─ is_executing: true
//!     ├─ body(arg).await
//!     ├─ is_executing: false            (also when the future is dropped)
//!     └─ Err(e) → thrown_errors: e, then returned to the caller
//! ```
//!
//! The optional gate is an external `Subject<bool>`. Until it publishes a
//! value the command is disabled; a replaying subject opens it at once.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use log::debug;

use super::disposable::{DisposeError, Disposable};
use super::error::UsageError;
use super::lock;
use super::stream::{Observable, Observer, Subject, Subscription};
use crate::nav::NavigationError;

#[derive(Debug, Clone)]
pub enum CommandError {
    /// The can-execute gate is closed.
    Disabled,
    /// A previous execution has not settled yet.
    AlreadyExecuting,
    Navigation(NavigationError),
    Usage(UsageError),
    /// Any other failure raised by the command body.
    Failed(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Disabled => write!(f, "command cannot execute right now"),
            CommandError::AlreadyExecuting => write!(f, "command is already executing"),
            CommandError::Navigation(e) => write!(f, "{e}"),
            CommandError::Usage(e) => write!(f, "{e}"),
            CommandError::Failed(msg) => write!(f, "command failed: {msg}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Navigation(e) => Some(e),
            CommandError::Usage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NavigationError> for CommandError {
    fn from(e: NavigationError) -> Self {
        CommandError::Navigation(e)
    }
}

impl From<UsageError> for CommandError {
    fn from(e: UsageError) -> Self {
        CommandError::Usage(e)
    }
}

type Body<T> = Box<dyn Fn(T) -> BoxFuture<'static, Result<(), CommandError>> + Send + Sync>;

struct Inner<T> {
    body: Body<T>,
    running: AtomicBool,
    gate_open: Arc<AtomicBool>,
    gate: Mutex<Option<Subscription>>,
    executing: Subject<bool>,
    errors: Subject<CommandError>,
}

/// Cheap to clone; clones share state.
pub struct Command<T = ()> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Command<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Resets the running flag when an execution ends, even by cancellation.
struct Running<'a, T> {
    inner: &'a Inner<T>,
}

impl<T> Drop for Running<'_, T> {
    fn drop(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.executing.next(false);
    }
}

impl<T: Send + 'static> Command<T> {
    /// An always-enabled command.
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        Self::gated(body, None)
    }

    /// A command enabled only while `can_execute` last published `true`.
    pub fn gated<F, Fut>(body: F, can_execute: Option<Subject<bool>>) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        let gate_open = Arc::new(AtomicBool::new(can_execute.is_none()));
        let gate = can_execute.map(|signal| {
            let on_next = gate_open.clone();
            let on_error = gate_open.clone();
            signal.subscribe(
                Observer::new(move |open| on_next.store(open, Ordering::SeqCst))
                    .on_error(move |_| on_error.store(false, Ordering::SeqCst)),
            )
        });

        Self {
            inner: Arc::new(Inner {
                body: Box::new(move |arg| -> BoxFuture<'static, Result<(), CommandError>> {
                    Box::pin(body(arg))
                }),
                running: AtomicBool::new(false),
                gate_open,
                gate: Mutex::new(gate),
                executing: Subject::replaying(false),
                errors: Subject::new(),
            }),
        }
    }

    /// Executing state: `false` on subscribe, then `true`/`false` around each run.
    pub fn is_executing(&self) -> Observable<bool> {
        self.inner.executing.as_observable()
    }

    /// Failures raised by the body, published before they are returned.
    pub fn thrown_errors(&self) -> Observable<CommandError> {
        self.inner.errors.as_observable()
    }

    pub fn can_execute(&self) -> bool {
        self.inner.gate_open.load(Ordering::SeqCst) && !self.inner.running.load(Ordering::SeqCst)
    }

    pub async fn execute(&self, arg: T) -> Result<(), CommandError> {
        let inner = &*self.inner;
        if !inner.gate_open.load(Ordering::SeqCst) {
            return Err(CommandError::Disabled);
        }
        if inner.running.swap(true, Ordering::SeqCst) {
            return Err(CommandError::AlreadyExecuting);
        }

        let result = {
            let _running = Running { inner };
            inner.executing.next(true);
            (inner.body)(arg).await
        };

        if let Err(e) = &result {
            debug!("Command failed: {}", e);
            inner.errors.next(e.clone());
        }
        result
    }

    /// Detach from the gate and complete the command's streams.
    pub fn dispose(&self) {
        if let Some(gate) = lock(&self.inner.gate).take() {
            gate.unsubscribe();
        }
        self.inner.gate_open.store(false, Ordering::SeqCst);
        self.inner.executing.complete();
        self.inner.errors.complete();
    }
}

impl<T: Send + 'static> Disposable for Command<T> {
    fn dispose(self: Box<Self>) -> Result<(), DisposeError> {
        Command::dispose(&self);
        Ok(())
    }
}
