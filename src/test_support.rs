//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::ImmediateScheduler;
use crate::nav::{NavigationEngine, NavigationGateway, NavigationOutcome, ParameterBag};
use crate::services::{
    ConnectivityMonitor, DialogError, Dialogs, InputPrompt, LoadingHandle, MapLocalizer, Platform,
};
use crate::viewmodel::{ViewModelContext, ViewModelCore};

#[derive(Debug, Clone)]
pub enum EngineCall {
    Navigate {
        uri: String,
        params: ParameterBag,
        use_modal: Option<bool>,
        animated: Option<bool>,
    },
    GoBack(ParameterBag),
    GoBackToRoot(ParameterBag),
}

/// Engine that records every call and answers from a queue of outcomes.
/// Succeeds once the queue is empty.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    outcomes: Mutex<VecDeque<NavigationOutcome>>,
}

impl RecordingEngine {
    pub fn push_outcome(&self, outcome: NavigationOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: EngineCall) -> NavigationOutcome {
        self.calls.lock().unwrap().push(call);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(NavigationOutcome::succeeded)
    }
}

#[async_trait]
impl NavigationEngine for RecordingEngine {
    async fn navigate(
        &self,
        uri: &str,
        params: ParameterBag,
        use_modal: Option<bool>,
        animated: Option<bool>,
    ) -> NavigationOutcome {
        self.answer(EngineCall::Navigate {
            uri: uri.to_string(),
            params,
            use_modal,
            animated,
        })
    }

    async fn go_back(&self, params: ParameterBag) -> NavigationOutcome {
        self.answer(EngineCall::GoBack(params))
    }

    async fn go_back_to_root(&self, params: ParameterBag) -> NavigationOutcome {
        self.answer(EngineCall::GoBackToRoot(params))
    }
}

/// Dialogs that log each presentation and return scripted answers.
#[derive(Default)]
pub struct FakeDialogs {
    calls: Mutex<Vec<String>>,
    choice: Mutex<Option<String>>,
    tap_action: AtomicBool,
    loading_visible: Arc<AtomicBool>,
}

impl FakeDialogs {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Answer for the next action sheet or input prompt.
    pub fn choose(&self, choice: Option<&str>) {
        *self.choice.lock().unwrap() = choice.map(str::to_string);
    }

    pub fn tap_snackbar_action(&self, tap: bool) {
        self.tap_action.store(tap, Ordering::SeqCst);
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Dialogs for FakeDialogs {
    async fn alert(
        &self,
        message: &str,
        _title: Option<&str>,
        dismiss_text: Option<&str>,
    ) -> Result<(), DialogError> {
        self.record(format!("alert {} [{}]", message, dismiss_text.unwrap_or_default()));
        Ok(())
    }

    async fn confirm(
        &self,
        message: &str,
        _title: Option<&str>,
        _ok_text: Option<&str>,
        _cancel_text: Option<&str>,
    ) -> Result<bool, DialogError> {
        self.record(format!("confirm {message}"));
        Ok(self.tap_action.load(Ordering::SeqCst))
    }

    async fn input(&self, prompt: InputPrompt) -> Result<Option<String>, DialogError> {
        self.record(format!("input {}", prompt.question));
        Ok(self.choice.lock().unwrap().clone())
    }

    async fn action_sheet(
        &self,
        title: &str,
        _accept_text: Option<&str>,
        _dismiss_text: Option<&str>,
        options: &[String],
    ) -> Result<Option<String>, DialogError> {
        self.record(format!("action_sheet {} {}", title, options.join("|")));
        Ok(self.choice.lock().unwrap().clone())
    }

    async fn loading(&self, message: &str) -> Result<LoadingHandle, DialogError> {
        self.record(format!("loading {message}"));
        self.loading_visible.store(true, Ordering::SeqCst);
        let visible = self.loading_visible.clone();
        Ok(LoadingHandle::new(move || visible.store(false, Ordering::SeqCst)))
    }

    async fn snackbar(
        &self,
        message: &str,
        duration_ms: Option<u64>,
        action_text: Option<&str>,
    ) -> Result<bool, DialogError> {
        self.record(format!(
            "snackbar {} [{}] {}ms",
            message,
            action_text.unwrap_or_default(),
            duration_ms.unwrap_or_default()
        ));
        Ok(self.tap_action.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
pub struct FakePlatform {
    opened: AtomicUsize,
}

impl FakePlatform {
    pub fn settings_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn open_app_settings(&self) -> bool {
        self.opened.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// A view-model core wired to fakes, plus handles to drive them.
pub struct TestHarness {
    pub core: ViewModelCore,
    pub connectivity: ConnectivityMonitor,
    pub engine: Arc<RecordingEngine>,
    pub dialogs: Arc<FakeDialogs>,
}

pub fn harness() -> TestHarness {
    let connectivity = ConnectivityMonitor::new(false);
    let engine = Arc::new(RecordingEngine::default());
    let dialogs = Arc::new(FakeDialogs::default());
    let localize: MapLocalizer = [("greeting", "Hello")].into_iter().collect();

    let context = ViewModelContext {
        navigation: NavigationGateway::new(engine.clone()),
        dialogs: dialogs.clone(),
        localize: Arc::new(localize),
        connectivity: Arc::new(connectivity.clone()),
        scheduler: Arc::new(ImmediateScheduler),
    };

    TestHarness {
        core: ViewModelCore::new(context),
        connectivity,
        engine,
        dialogs,
    }
}
