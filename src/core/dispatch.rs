//! # Dispatch
//!
//! All view-model state is mutated from one logical UI context. Work that
//! finishes elsewhere (connectivity callbacks, dialog presentation) is
//! marshaled back through a [`Scheduler`].
//!
//! - [`ImmediateScheduler`]: runs the job inline. Used in tests and when the
//!   caller already is the UI context.
//! - [`UiDispatcher`]: a single tokio task that owns every queued job. Jobs
//!   start in submission order and interleave only at `.await` points, which
//!   is exactly the cooperative model of a UI thread.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// A unit of work queued onto a scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    fn schedule(&self, job: Job);
}

/// Runs every job on the caller's stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, job: Job) {
        job();
    }
}

/// The dispatcher stopped before the job produced a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    Closed,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Closed => write!(f, "UI dispatcher is closed"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Handle to a job running on the [`UiDispatcher`]. Resolves to the job's output.
pub struct DispatchHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for DispatchHandle<T> {
    type Output = Result<T, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| DispatchError::Closed))
    }
}

/// Cloneable sender side of the UI context.
#[derive(Clone)]
pub struct UiDispatcher {
    tx: mpsc::UnboundedSender<BoxFuture<'static, ()>>,
}

impl UiDispatcher {
    /// Start the UI context on the current tokio runtime.
    ///
    /// The pump exits once every `UiDispatcher` clone is dropped and the
    /// in-flight jobs have settled.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(pump(rx));
        (Self { tx }, pump)
    }

    /// Run `future` on the UI context and return a handle to its result.
    pub fn run<F, T>(&self, future: F) -> DispatchHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, rx) = oneshot::channel();
        let job = Box::pin(async move {
            // Receiver may be gone if the caller stopped waiting.
            let _ = result_tx.send(future.await);
        });
        if self.tx.send(job).is_err() {
            debug!("UI dispatcher closed, dropping job");
        }
        DispatchHandle { rx }
    }
}

impl Scheduler for UiDispatcher {
    fn schedule(&self, job: Job) {
        if self.tx.send(Box::pin(async move { job() })).is_err() {
            debug!("UI dispatcher closed, dropping scheduled job");
        }
    }
}

async fn pump(mut rx: mpsc::UnboundedReceiver<BoxFuture<'static, ()>>) {
    let mut in_flight = FuturesUnordered::new();
    loop {
        tokio::select! {
            biased;
            job = rx.recv() => match job {
                Some(job) => in_flight.push(job),
                None => break,
            },
            Some(()) = in_flight.next(), if !in_flight.is_empty() => {}
        }
    }
    while in_flight.next().await.is_some() {}
    debug!("UI dispatcher stopped");
}
