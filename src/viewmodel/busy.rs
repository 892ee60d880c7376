//! # Busy Binding
//!
//! Mirrors a command's executing stream into a view-model's busy flag.
//!
//! ```text
//!   is_executing:  false ── true ──────── false ── ... ── error | complete
//!   busy:          false ── true ──────── false ── ... ── false
//! ```
//!
//! Stream errors are swallowed after resetting the flag. The subscription
//! belongs to the scope handed to [`CommandBusyBinder::bind`], normally the
//! active scope, so a deactivated view-model stops tracking its commands.

use log::{debug, warn};

use crate::core::{Command, Observer, Property, ResourceScope, UsageError};

#[derive(Clone)]
pub struct CommandBusyBinder {
    busy: Property<bool>,
}

impl CommandBusyBinder {
    pub fn new(busy: Property<bool>) -> Self {
        Self { busy }
    }

    pub fn bind<T: Send + 'static>(
        &self,
        command: &Command<T>,
        scope: &ResourceScope,
    ) -> Result<(), UsageError> {
        self.busy.ensure_writable()?;

        let on_next = self.busy.clone();
        let on_error = self.busy.clone();
        let on_complete = self.busy.clone();
        let subscription = command.is_executing().subscribe(
            Observer::new(move |executing| {
                on_next.set(executing);
            })
            .on_error(move |e| {
                warn!("Busy binding stream failed: {}", e);
                on_error.set(false);
            })
            .on_complete(move || {
                on_complete.set(false);
            }),
        );
        debug!("Bound {} to command into {} scope", self.busy.name(), scope.label());
        scope.add(subscription);
        Ok(())
    }
}
