//! # Lifecycle Hooks
//!
//! [`ViewModel`] is what page authors implement: hand out the
//! [`ViewModelCore`] and override whichever hooks matter. Hosts drive the
//! page through [`LifecycleExt`], which calls the hooks in a fixed order
//! around the core's state transitions:
//!
//! ```text
//!   arrive(params)          initialize → initialize_async → on_navigated_to
//!   appear()                activate → on_appearing
//!   disappear()             on_disappearing
//!   navigated_from(params)  on_navigated_from → deactivate
//!   tear_down()             on_destroy → destroy
//! ```

use async_trait::async_trait;
use log::debug;

use super::base::ViewModelCore;
use crate::core::{CommandError, UsageError};
use crate::nav::ParameterBag;

#[async_trait]
pub trait ViewModel: Send + Sync {
    fn core(&self) -> &ViewModelCore;

    /// Synchronous setup, once per navigation arrival.
    fn initialize(&self, _params: &ParameterBag) {}

    async fn initialize_async(&self, _params: &ParameterBag) -> Result<(), CommandError> {
        Ok(())
    }

    fn on_navigated_to(&self, _params: &ParameterBag) {}

    fn on_navigated_from(&self, _params: &ParameterBag) {}

    fn on_appearing(&self) {}

    fn on_disappearing(&self) {}

    /// Release anything the destroy scope does not own.
    fn on_destroy(&self) {}

    /// Asked before the page is navigated away from.
    async fn can_navigate(&self, _params: &ParameterBag) -> bool {
        true
    }
}

#[async_trait]
pub trait LifecycleExt: ViewModel {
    async fn arrive(&self, params: ParameterBag) -> Result<(), CommandError> {
        debug!("ViewModel {} arriving", self.core().id());
        self.initialize(&params);
        self.initialize_async(&params).await?;
        self.on_navigated_to(&params);
        Ok(())
    }

    fn appear(&self) -> Result<(), UsageError> {
        self.core().activate()?;
        self.on_appearing();
        Ok(())
    }

    fn disappear(&self) {
        self.on_disappearing();
    }

    fn navigated_from(&self, params: &ParameterBag) -> Result<(), UsageError> {
        self.on_navigated_from(params);
        self.core().deactivate()
    }

    fn tear_down(&self) {
        self.on_destroy();
        self.core().destroy();
    }

    async fn confirm_navigation(&self, params: &ParameterBag) -> bool {
        let allowed = self.can_navigate(params).await;
        if !allowed {
            debug!("ViewModel {} vetoed navigation", self.core().id());
        }
        allowed
    }
}

impl<V: ViewModel + ?Sized> LifecycleExt for V {}
