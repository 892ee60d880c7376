//! # Observable Properties
//!
//! A view-model field that notifies on change. Backed by a replaying
//! [`Subject`], so a new subscriber immediately sees the current value.
//!
//! Derived properties (e.g. internet availability, projected from a stream)
//! are created with [`Property::read_only`]. Their owner still updates them
//! through [`Property::set`]; binding helpers that write back into a
//! property refuse them with [`UsageError::ReadOnlyProperty`].

use std::sync::{Arc, Mutex};

use super::dispatch::Scheduler;
use super::error::UsageError;
use super::lock;
use super::stream::{Observer, Subject, Subscription};

pub struct Property<T> {
    name: &'static str,
    writable: bool,
    /// Updated under the subject's lock, in step with its replay value.
    value: Arc<Mutex<T>>,
    subject: Subject<T>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            writable: self.writable,
            value: self.value.clone(),
            subject: self.subject.clone(),
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> Property<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            writable: true,
            value: Arc::new(Mutex::new(initial.clone())),
            subject: Subject::replaying(initial),
        }
    }

    pub fn read_only(name: &'static str, initial: T) -> Self {
        Self {
            writable: false,
            ..Self::new(name, initial)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Current value.
    pub fn get(&self) -> T {
        lock(&self.value).clone()
    }

    /// Store `value`, notifying subscribers only when it differs. Returns whether it changed.
    pub fn set(&self, value: T) -> bool {
        self.subject.publish(value, |_, new| {
            let mut current = lock(&self.value);
            if *current == *new {
                return false;
            }
            *current = new.clone();
            true
        })
    }

    /// Guard for helpers that write into the property on the caller's behalf.
    pub fn ensure_writable(&self) -> Result<(), UsageError> {
        if self.writable {
            Ok(())
        } else {
            Err(UsageError::ReadOnlyProperty(self.name.to_string()))
        }
    }

    /// Observe changes. The current value is delivered first.
    #[must_use = "dropping a Subscription does not unsubscribe; add it to a scope"]
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        self.subject.subscribe(observer)
    }

    #[must_use = "dropping a Subscription does not unsubscribe; add it to a scope"]
    pub fn subscribe_on(&self, scheduler: Arc<dyn Scheduler>, observer: Observer<T>) -> Subscription {
        self.subject.subscribe_on(scheduler, observer)
    }
}

impl<T: Clone + PartialEq + Send + std::fmt::Debug + 'static> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.get())
            .finish()
    }
}
