//! # View-Model Core
//!
//! State every view-model carries, composed from the core primitives:
//!
//! ```text
//!   Created ──activate──▶ Activated ◀──activate── Deactivated
//!      │                     │ ──deactivate──▶       │
//!      └──────────── destroy ┴──────────────────────┴──▶ Destroyed
//! ```
//!
//! - Activating subscribes to connectivity inside the active scope.
//! - Deactivating disposes the active scope.
//! - Destroying disposes both scopes. It is terminal and idempotent.
//! - Dropping a core without destroying it still releases both scopes.
//!
//! Repeated activation or deactivation is a no-op. Activation or
//! deactivation after destruction is a [`UsageError::InvalidTransition`].

use std::fmt;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;

use super::busy::CommandBusyBinder;
use crate::core::{
    Command, Observer, Property, ResourceScope, Scheduler, ScopeManager, UsageError, lock,
};
use crate::nav::NavigationGateway;
use crate::services::{Connectivity, Dialogs, Localize, LocalizeExt};

/// Collaborators injected into every view-model.
#[derive(Clone)]
pub struct ViewModelContext {
    pub navigation: NavigationGateway,
    pub dialogs: Arc<dyn Dialogs>,
    pub localize: Arc<dyn Localize>,
    pub connectivity: Arc<dyn Connectivity>,
    /// Where connectivity notifications are delivered.
    pub scheduler: Arc<dyn Scheduler>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Activated,
    Deactivated,
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "Created",
            LifecycleState::Activated => "Activated",
            LifecycleState::Deactivated => "Deactivated",
            LifecycleState::Destroyed => "Destroyed",
        };
        f.write_str(name)
    }
}

pub struct ViewModelCore {
    id: Uuid,
    context: ViewModelContext,
    scopes: ScopeManager,
    state: Mutex<LifecycleState>,
    is_busy: Property<bool>,
    title: Property<Option<String>>,
    is_internet_available: Property<bool>,
}

impl ViewModelCore {
    pub fn new(context: ViewModelContext) -> Self {
        let id = Uuid::new_v4();
        debug!("ViewModel {} created", id);
        Self {
            id,
            context,
            scopes: ScopeManager::new(),
            state: Mutex::new(LifecycleState::Created),
            is_busy: Property::new("is_busy", false),
            title: Property::new("title", None),
            is_internet_available: Property::read_only("is_internet_available", false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> LifecycleState {
        *lock(&self.state)
    }

    pub fn is_busy(&self) -> &Property<bool> {
        &self.is_busy
    }

    pub fn title(&self) -> &Property<Option<String>> {
        &self.title
    }

    /// Derived from the connectivity stream while activated.
    pub fn is_internet_available(&self) -> &Property<bool> {
        &self.is_internet_available
    }

    pub fn navigation(&self) -> &NavigationGateway {
        &self.context.navigation
    }

    pub fn dialogs(&self) -> &Arc<dyn Dialogs> {
        &self.context.dialogs
    }

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.context.scheduler.clone()
    }

    /// Current active scope, created if the last one was disposed.
    pub fn active_scope(&self) -> Arc<ResourceScope> {
        self.scopes.active_scope()
    }

    pub fn destroy_scope(&self) -> Arc<ResourceScope> {
        self.scopes.destroy_scope()
    }

    pub fn activate(&self) -> Result<(), UsageError> {
        // The state lock is never held while observers or cleanups run.
        let scope = {
            let mut state = lock(&self.state);
            match *state {
                LifecycleState::Activated => return Ok(()),
                LifecycleState::Destroyed => return Err(self.invalid(*state, "activate")),
                LifecycleState::Created | LifecycleState::Deactivated => {}
            }
            *state = LifecycleState::Activated;
            self.scopes.active_scope()
        };
        debug!("ViewModel {} activated", self.id);

        let on_next = self.is_internet_available.clone();
        let on_error = self.is_internet_available.clone();
        let id = self.id;
        let subscription = self.context.connectivity.internet_status().subscribe_on(
            self.context.scheduler.clone(),
            Observer::new(move |online| {
                on_next.set(online);
            })
            .on_error(move |e| {
                warn!("ViewModel {} connectivity stream failed: {}", id, e);
                on_error.set(false);
            }),
        );
        // Released at once if a callback already deactivated this scope.
        scope.add(subscription);
        Ok(())
    }

    pub fn deactivate(&self) -> Result<(), UsageError> {
        let scope = {
            let mut state = lock(&self.state);
            match *state {
                LifecycleState::Activated => {}
                LifecycleState::Created | LifecycleState::Deactivated => return Ok(()),
                LifecycleState::Destroyed => return Err(self.invalid(*state, "deactivate")),
            }
            *state = LifecycleState::Deactivated;
            self.scopes.take_active()
        };
        if let Some(scope) = scope {
            scope.dispose();
        }
        debug!("ViewModel {} deactivated", self.id);
        Ok(())
    }

    /// Dispose both scopes. Safe to call more than once.
    pub fn destroy(&self) {
        let active = {
            let mut state = lock(&self.state);
            if *state == LifecycleState::Destroyed {
                return;
            }
            *state = LifecycleState::Destroyed;
            self.scopes.take_active()
        };
        if let Some(scope) = active {
            scope.dispose();
        }
        self.scopes.destroy();
        debug!("ViewModel {} destroyed", self.id);
    }

    /// Drive `is_busy` from `command` for as long as the current active scope lives.
    pub fn bind_busy<T: Send + 'static>(&self, command: &Command<T>) -> Result<(), UsageError> {
        let state = self.state();
        if state == LifecycleState::Destroyed {
            return Err(self.invalid(state, "bind commands on"));
        }
        CommandBusyBinder::new(self.is_busy.clone()).bind(command, &self.scopes.active_scope())
    }

    /// Run `action` each time `property` receives a value, then clear it.
    ///
    /// Meant for selection properties bound to a list: the selection is
    /// consumed so the same item can be picked again. Lives until destroy.
    pub fn when_value_selected<T, F>(&self, property: &Property<Option<T>>, action: F) -> Result<(), UsageError>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        property.ensure_writable()?;
        let target = property.clone();
        let subscription = property.subscribe(Observer::new(move |selected: Option<T>| {
            if let Some(value) = selected {
                target.set(None);
                action(value);
            }
        }));
        self.scopes.destroy_scope().add(subscription);
        Ok(())
    }

    pub fn localized(&self, key: &str) -> String {
        self.context.localize.get(key)
    }

    pub fn localize_enum<E: Serialize + ?Sized>(&self, value: &E) -> Result<String, UsageError> {
        self.context.localize.get_enum(value)
    }

    fn invalid(&self, state: LifecycleState, event: &'static str) -> UsageError {
        UsageError::InvalidTransition {
            state: state.to_string(),
            event,
        }
    }
}

impl fmt::Debug for ViewModelCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelCore")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("is_busy", &self.is_busy.get())
            .finish()
    }
}
