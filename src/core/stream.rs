//! # Streams
//!
//! A small publish/subscribe primitive with an explicit
//! next / error / complete contract.
//!
//! ```text
//!   Subject ──next(v)──▶ Observer::on_next      (any number of times)
//!           ──error(e)─▶ Observer::on_error     (terminal, at most once)
//!           ──complete─▶ Observer::on_complete  (terminal, at most once)
//! ```
//!
//! Guarantees:
//! - After `Subscription::unsubscribe`, the observer receives nothing more,
//!   even notifications already queued on a scheduler.
//! - After a terminal notification, later subscribers get that terminal
//!   notification immediately and nothing else.
//! - A replaying subject hands its latest value to each new subscriber.
//!
//! Callbacks run outside the subject's lock, so an observer may freely
//! subscribe, unsubscribe, or publish from inside a callback.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use super::disposable::{DisposeError, Disposable};
use super::dispatch::Scheduler;
use super::lock;

/// Error carried by a stream's terminal `error` notification.
pub type StreamError = Arc<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
struct MessageError(String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for MessageError {}

/// Build a [`StreamError`] from a plain message.
pub fn stream_error(message: impl Into<String>) -> StreamError {
    Arc::new(MessageError(message.into()))
}

type NextFn<T> = Box<dyn Fn(T) + Send + Sync>;
type ErrorFn = Box<dyn Fn(StreamError) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// Callbacks for one subscriber. Error and completion default to no-ops.
pub struct Observer<T> {
    on_next: NextFn<T>,
    on_error: ErrorFn,
    on_complete: CompleteFn,
}

impl<T> Observer<T> {
    pub fn new(on_next: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            on_next: Box::new(on_next),
            on_error: Box::new(|_| {}),
            on_complete: Box::new(|| {}),
        }
    }

    pub fn on_error(mut self, on_error: impl Fn(StreamError) + Send + Sync + 'static) -> Self {
        self.on_error = Box::new(on_error);
        self
    }

    pub fn on_complete(mut self, on_complete: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Box::new(on_complete);
        self
    }
}

#[derive(Clone)]
enum Terminal {
    Error(StreamError),
    Complete,
}

enum Notification<T> {
    Next(T),
    Terminal(Terminal),
}

/// Delivery path for one subscriber: either inline or through a scheduler.
struct Sink<T> {
    observer: Arc<Observer<T>>,
    active: Arc<AtomicBool>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl<T> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self {
            observer: self.observer.clone(),
            active: self.active.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: Send + 'static> Sink<T> {
    fn deliver(&self, notification: Notification<T>) {
        match &self.scheduler {
            None => Self::invoke(&self.observer, &self.active, notification),
            Some(scheduler) => {
                let observer = self.observer.clone();
                let active = self.active.clone();
                scheduler.schedule(Box::new(move || {
                    Self::invoke(&observer, &active, notification)
                }));
            }
        }
    }

    fn invoke(observer: &Observer<T>, active: &AtomicBool, notification: Notification<T>) {
        if !active.load(Ordering::SeqCst) {
            return;
        }
        match notification {
            Notification::Next(value) => (observer.on_next)(value),
            Notification::Terminal(Terminal::Error(err)) => (observer.on_error)(err),
            Notification::Terminal(Terminal::Complete) => (observer.on_complete)(),
        }
    }
}

struct State<T> {
    sinks: Vec<(u64, Sink<T>)>,
    next_id: u64,
    replay: bool,
    latest: Option<T>,
    terminal: Option<Terminal>,
}

/// A broadcast stream. Clones share the same subscribers.
pub struct Subject<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// A subject that only forwards values published after subscription.
    pub fn new() -> Self {
        Self::with_state(false, None)
    }

    /// A subject that remembers its latest value and replays it to new subscribers.
    pub fn replaying(initial: T) -> Self {
        Self::with_state(true, Some(initial))
    }

    fn with_state(replay: bool, latest: Option<T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                sinks: Vec::new(),
                next_id: 0,
                replay,
                latest,
                terminal: None,
            })),
        }
    }

    /// Latest value of a replaying subject.
    pub fn latest(&self) -> Option<T> {
        lock(&self.state).latest.clone()
    }

    pub fn is_terminated(&self) -> bool {
        lock(&self.state).terminal.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).sinks.len()
    }

    /// Publish a value to every current subscriber.
    pub fn next(&self, value: T) {
        self.publish(value, |_, _| true);
    }

    /// Publish only if `value` differs from the latest one. Returns whether it was published.
    pub fn next_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.publish(value, |latest, value| latest != Some(value))
    }

    /// Publish if `accept` agrees. `accept` runs under the subject's lock.
    pub(crate) fn publish(&self, value: T, accept: impl FnOnce(Option<&T>, &T) -> bool) -> bool {
        let sinks = {
            let mut state = lock(&self.state);
            if state.terminal.is_some() || !accept(state.latest.as_ref(), &value) {
                return false;
            }
            if state.replay {
                state.latest = Some(value.clone());
            }
            state
                .sinks
                .iter()
                .map(|(_, sink)| sink.clone())
                .collect::<Vec<_>>()
        };
        for sink in sinks {
            sink.deliver(Notification::Next(value.clone()));
        }
        true
    }

    /// Terminate the stream with an error.
    pub fn error(&self, error: StreamError) {
        self.terminate(Terminal::Error(error));
    }

    /// Terminate the stream normally.
    pub fn complete(&self) {
        self.terminate(Terminal::Complete);
    }

    fn terminate(&self, terminal: Terminal) {
        let sinks = {
            let mut state = lock(&self.state);
            if state.terminal.is_some() {
                return;
            }
            state.terminal = Some(terminal.clone());
            std::mem::take(&mut state.sinks)
        };
        for (_, sink) in sinks {
            sink.deliver(Notification::Terminal(terminal.clone()));
        }
    }

    /// Subscribe with callbacks invoked on the publisher's stack.
    #[must_use = "dropping a Subscription does not unsubscribe; add it to a scope"]
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        self.attach(observer, None)
    }

    /// Subscribe with callbacks marshaled onto `scheduler`.
    #[must_use = "dropping a Subscription does not unsubscribe; add it to a scope"]
    pub fn subscribe_on(&self, scheduler: Arc<dyn Scheduler>, observer: Observer<T>) -> Subscription {
        self.attach(observer, Some(scheduler))
    }

    fn attach(&self, observer: Observer<T>, scheduler: Option<Arc<dyn Scheduler>>) -> Subscription {
        let sink = Sink {
            observer: Arc::new(observer),
            active: Arc::new(AtomicBool::new(true)),
            scheduler,
        };
        let active = sink.active.clone();

        let (id, replay, terminal) = {
            let mut state = lock(&self.state);
            if let Some(terminal) = state.terminal.clone() {
                (None, None, Some(terminal))
            } else {
                let id = state.next_id;
                state.next_id += 1;
                state.sinks.push((id, sink.clone()));
                (Some(id), state.latest.clone(), None)
            }
        };

        if let Some(terminal) = terminal {
            sink.deliver(Notification::Terminal(terminal));
        } else if let Some(value) = replay {
            sink.deliver(Notification::Next(value));
        }

        let detach: Option<Box<dyn FnOnce() + Send + Sync>> = id.map(|id| {
            let weak: Weak<Mutex<State<T>>> = Arc::downgrade(&self.state);
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    lock(&state).sinks.retain(|(sink_id, _)| *sink_id != id);
                }
            }) as Box<dyn FnOnce() + Send + Sync>
        });

        Subscription { active, detach }
    }

    /// A handle that can subscribe to this subject but never publish into it.
    pub fn as_observable(&self) -> Observable<T> {
        Observable {
            subject: self.clone(),
        }
    }
}

/// Read-only side of a [`Subject`], handed to consumers of a stream they do not own.
///
/// ```compile_fail
/// use waypoint::core::Subject;
///
/// let status = Subject::replaying(true).as_observable();
/// status.complete();
/// ```
pub struct Observable<T> {
    subject: Subject<T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> From<Subject<T>> for Observable<T> {
    fn from(subject: Subject<T>) -> Self {
        Self { subject }
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    pub fn latest(&self) -> Option<T> {
        self.subject.latest()
    }

    pub fn is_terminated(&self) -> bool {
        self.subject.is_terminated()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }

    #[must_use = "dropping a Subscription does not unsubscribe; add it to a scope"]
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        self.subject.subscribe(observer)
    }

    #[must_use = "dropping a Subscription does not unsubscribe; add it to a scope"]
    pub fn subscribe_on(&self, scheduler: Arc<dyn Scheduler>, observer: Observer<T>) -> Subscription {
        self.subject.subscribe_on(scheduler, observer)
    }
}

/// Handle to one subscriber.
///
/// Dropping the handle leaves the subscription running. Call
/// [`unsubscribe`](Self::unsubscribe) or hand it to a scope.
pub struct Subscription {
    active: Arc<AtomicBool>,
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Disposable for Subscription {
    fn dispose(mut self: Box<Self>) -> Result<(), DisposeError> {
        self.release();
        Ok(())
    }
}
