//! # Core Primitives
//!
//! The building blocks every view-model is made of. Nothing in here knows
//! about navigation or pages; it only knows how to publish values, own
//! resources, and tear them down again.
//!
//! ```text
//!   Subject<T> ──subscribe──▶ Subscription ──add──▶ ResourceScope
//!       ▲                                              │
//!       │ next/error/complete                          │ dispose()
//!   Property<T>, Command<T>                            ▼
//!                                          every member released once
//! ```
//!
//! ## Modules
//!
//! - [`stream`]: `Subject`, its read-only `Observable`, `Observer`, `Subscription`
//! - [`disposable`]: the `Disposable` trait and its stock implementations
//! - [`scope`]: `ResourceScope` and the two-tier `ScopeManager`
//! - [`property`]: observable view-model properties
//! - [`command`]: async commands with an executing stream
//! - [`dispatch`]: schedulers and the UI dispatcher
//! - [`config`]: settings with a defaults → file → env → CLI hierarchy
//! - [`error`]: usage errors shared across modules

pub mod command;
pub mod config;
pub mod disposable;
pub mod dispatch;
pub mod error;
pub mod property;
pub mod scope;
pub mod stream;

pub use command::{Command, CommandError};
pub use disposable::{DisposeError, Disposable};
pub use dispatch::{DispatchError, DispatchHandle, ImmediateScheduler, Scheduler, UiDispatcher};
pub use error::UsageError;
pub use property::Property;
pub use scope::{ResourceScope, ScopeManager};
pub use stream::{Observable, Observer, StreamError, Subject, Subscription};

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// All shared state in this crate is plain bookkeeping (lists of observers,
/// scope members), so a poisoned lock still holds usable data.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
