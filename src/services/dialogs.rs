//! # Dialogs
//!
//! The dialog collaborator as view-models see it: every prompt is async and
//! returns a typed result. Presentation itself belongs to the platform.
//!
//! [`DispatchedDialogs`] wraps a platform implementation so that
//! presentation that must happen on the UI context (alerts, prompts, action
//! sheets) is marshaled through the [`UiDispatcher`].
//!
//! [`SettingsPrompter`] covers the "permission denied, open settings?" flow.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::core::config::{
    DEFAULT_DISMISS_TEXT, DEFAULT_OPEN_SETTINGS_TEXT, DEFAULT_SNACKBAR_DURATION_MS, ResolvedConfig,
};
use crate::core::{DispatchError, DisposeError, Disposable, UiDispatcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// The UI context went away before the dialog resolved.
    Dispatch(DispatchError),
    /// The platform could not present the dialog.
    Presentation(String),
}

impl fmt::Display for DialogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogError::Dispatch(e) => write!(f, "dialog dispatch failed: {e}"),
            DialogError::Presentation(msg) => write!(f, "dialog presentation failed: {msg}"),
        }
    }
}

impl std::error::Error for DialogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DialogError::Dispatch(e) => Some(e),
            DialogError::Presentation(_) => None,
        }
    }
}

impl From<DispatchError> for DialogError {
    fn from(e: DispatchError) -> Self {
        DialogError::Dispatch(e)
    }
}

/// Text-entry prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPrompt {
    pub question: String,
    pub title: Option<String>,
    pub accept_text: Option<String>,
    pub dismiss_text: Option<String>,
    pub placeholder: Option<String>,
    pub max_length: Option<usize>,
}

impl InputPrompt {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

/// Keeps a loading indicator visible until released or dropped.
pub struct LoadingHandle {
    hide: Option<Box<dyn FnOnce() + Send>>,
}

impl LoadingHandle {
    pub fn new(hide: impl FnOnce() + Send + 'static) -> Self {
        Self {
            hide: Some(Box::new(hide)),
        }
    }

    /// A handle with nothing to hide, for platforms without an indicator.
    pub fn noop() -> Self {
        Self { hide: None }
    }

    pub fn release(mut self) {
        self.hide_now();
    }

    fn hide_now(&mut self) {
        if let Some(hide) = self.hide.take() {
            hide();
        }
    }
}

impl Drop for LoadingHandle {
    fn drop(&mut self) {
        self.hide_now();
    }
}

impl Disposable for LoadingHandle {
    fn dispose(self: Box<Self>) -> Result<(), DisposeError> {
        self.release();
        Ok(())
    }
}

#[async_trait]
pub trait Dialogs: Send + Sync {
    async fn alert(
        &self,
        message: &str,
        title: Option<&str>,
        dismiss_text: Option<&str>,
    ) -> Result<(), DialogError>;

    async fn confirm(
        &self,
        message: &str,
        title: Option<&str>,
        ok_text: Option<&str>,
        cancel_text: Option<&str>,
    ) -> Result<bool, DialogError>;

    /// `None` when the prompt was dismissed.
    async fn input(&self, prompt: InputPrompt) -> Result<Option<String>, DialogError>;

    /// The chosen option, or `None` when dismissed.
    async fn action_sheet(
        &self,
        title: &str,
        accept_text: Option<&str>,
        dismiss_text: Option<&str>,
        options: &[String],
    ) -> Result<Option<String>, DialogError>;

    async fn loading(&self, message: &str) -> Result<LoadingHandle, DialogError>;

    /// Returns whether the snackbar's action was tapped.
    async fn snackbar(
        &self,
        message: &str,
        duration_ms: Option<u64>,
        action_text: Option<&str>,
    ) -> Result<bool, DialogError>;
}

/// Defaults applied when a caller leaves dialog text unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSettings {
    pub dismiss_text: String,
    pub snackbar_duration_ms: u64,
    pub open_settings_text: String,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            dismiss_text: DEFAULT_DISMISS_TEXT.to_string(),
            snackbar_duration_ms: DEFAULT_SNACKBAR_DURATION_MS,
            open_settings_text: DEFAULT_OPEN_SETTINGS_TEXT.to_string(),
        }
    }
}

impl From<&ResolvedConfig> for DialogSettings {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            dismiss_text: config.dismiss_text.clone(),
            snackbar_duration_ms: config.snackbar_duration_ms,
            open_settings_text: config.open_settings_text.clone(),
        }
    }
}

/// Routes UI-bound presentation through the [`UiDispatcher`] and fills in
/// default texts.
pub struct DispatchedDialogs {
    inner: Arc<dyn Dialogs>,
    dispatcher: UiDispatcher,
    settings: DialogSettings,
}

impl DispatchedDialogs {
    pub fn new(inner: Arc<dyn Dialogs>, dispatcher: UiDispatcher, settings: DialogSettings) -> Self {
        Self {
            inner,
            dispatcher,
            settings,
        }
    }

    async fn on_ui<T, F, Fut>(&self, present: F) -> Result<T, DialogError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn Dialogs>) -> Fut + Send,
        Fut: Future<Output = Result<T, DialogError>> + Send + 'static,
    {
        self.dispatcher.run(present(self.inner.clone())).await?
    }
}

#[async_trait]
impl Dialogs for DispatchedDialogs {
    async fn alert(
        &self,
        message: &str,
        title: Option<&str>,
        dismiss_text: Option<&str>,
    ) -> Result<(), DialogError> {
        let message = message.to_string();
        let title = title.map(str::to_string);
        let dismiss = dismiss_text
            .unwrap_or(self.settings.dismiss_text.as_str())
            .to_string();
        self.on_ui(move |dialogs| async move {
            dialogs.alert(&message, title.as_deref(), Some(dismiss.as_str())).await
        })
        .await
    }

    async fn confirm(
        &self,
        message: &str,
        title: Option<&str>,
        ok_text: Option<&str>,
        cancel_text: Option<&str>,
    ) -> Result<bool, DialogError> {
        self.inner.confirm(message, title, ok_text, cancel_text).await
    }

    async fn input(&self, prompt: InputPrompt) -> Result<Option<String>, DialogError> {
        self.on_ui(move |dialogs| async move { dialogs.input(prompt).await })
            .await
    }

    async fn action_sheet(
        &self,
        title: &str,
        accept_text: Option<&str>,
        dismiss_text: Option<&str>,
        options: &[String],
    ) -> Result<Option<String>, DialogError> {
        let title = title.to_string();
        let accept = accept_text.map(str::to_string);
        let dismiss = dismiss_text.map(str::to_string);
        let options = options.to_vec();
        self.on_ui(move |dialogs| async move {
            dialogs
                .action_sheet(&title, accept.as_deref(), dismiss.as_deref(), &options)
                .await
        })
        .await
    }

    async fn loading(&self, message: &str) -> Result<LoadingHandle, DialogError> {
        self.inner.loading(message).await
    }

    async fn snackbar(
        &self,
        message: &str,
        duration_ms: Option<u64>,
        action_text: Option<&str>,
    ) -> Result<bool, DialogError> {
        let duration = duration_ms.unwrap_or(self.settings.snackbar_duration_ms);
        self.inner.snackbar(message, Some(duration), action_text).await
    }
}

/// Result of a platform permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Unknown,
    NotSupported,
    NotSetup,
    Disabled,
    Restricted,
    Denied,
    Available,
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Open this app's page in the system settings. Returns whether it opened.
    async fn open_app_settings(&self) -> bool;
}

pub struct SettingsPrompter {
    dialogs: Arc<dyn Dialogs>,
    platform: Arc<dyn Platform>,
    settings: DialogSettings,
}

impl SettingsPrompter {
    pub fn new(dialogs: Arc<dyn Dialogs>, platform: Arc<dyn Platform>, settings: DialogSettings) -> Self {
        Self {
            dialogs,
            platform,
            settings,
        }
    }

    /// Show `message` with an "open settings" action. Returns whether the action was tapped.
    pub async fn snackbar_to_open_app_settings(&self, message: &str) -> Result<bool, DialogError> {
        let tapped = self
            .dialogs
            .snackbar(
                message,
                Some(self.settings.snackbar_duration_ms),
                Some(self.settings.open_settings_text.as_str()),
            )
            .await?;
        if tapped {
            let opened = self.platform.open_app_settings().await;
            info!("Opened app settings: {}", opened);
        }
        Ok(tapped)
    }

    /// Run `request`; on `Denied` or `Restricted`, offer the settings page.
    pub async fn open_app_settings_if<F, Fut>(
        &self,
        request: F,
        denied_message: &str,
        restricted_message: &str,
    ) -> Result<AccessState, DialogError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AccessState> + Send,
    {
        let state = request().await;
        debug!("Access request returned {:?}", state);
        match state {
            AccessState::Denied => {
                self.snackbar_to_open_app_settings(denied_message).await?;
            }
            AccessState::Restricted => {
                self.snackbar_to_open_app_settings(restricted_message).await?;
            }
            _ => {}
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDialogs, FakePlatform};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_loading_handle_hides_on_release_and_drop() {
        let hidden = Arc::new(AtomicBool::new(false));
        let flag = hidden.clone();
        LoadingHandle::new(move || flag.store(true, Ordering::SeqCst)).release();
        assert!(hidden.load(Ordering::SeqCst));

        let hidden = Arc::new(AtomicBool::new(false));
        let flag = hidden.clone();
        {
            let _handle = LoadingHandle::new(move || flag.store(true, Ordering::SeqCst));
        }
        assert!(hidden.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dispatched_alert_uses_default_dismiss_text() {
        let (dispatcher, _pump) = UiDispatcher::spawn();
        let fake = Arc::new(FakeDialogs::default());
        let dialogs = DispatchedDialogs::new(fake.clone(), dispatcher, DialogSettings::default());

        dialogs.alert("Saved", None, None).await.unwrap();

        assert_eq!(fake.calls(), vec!["alert Saved [OK]"]);
    }

    #[tokio::test]
    async fn test_dispatched_action_sheet_returns_choice() {
        let (dispatcher, _pump) = UiDispatcher::spawn();
        let fake = Arc::new(FakeDialogs::default());
        fake.choose(Some("Delete"));
        let dialogs = DispatchedDialogs::new(fake.clone(), dispatcher, DialogSettings::default());

        let choice = dialogs
            .action_sheet("Options", None, Some("Cancel"), &["Edit".to_string(), "Delete".to_string()])
            .await
            .unwrap();

        assert_eq!(choice.as_deref(), Some("Delete"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_surfaces_as_dialog_error() {
        let (dispatcher, pump) = UiDispatcher::spawn();
        pump.abort();
        let _ = pump.await;
        let dialogs = DispatchedDialogs::new(
            Arc::new(FakeDialogs::default()),
            dispatcher,
            DialogSettings::default(),
        );

        let err = dialogs.input(InputPrompt::new("Name?")).await.unwrap_err();
        assert_eq!(err, DialogError::Dispatch(DispatchError::Closed));
    }

    #[tokio::test]
    async fn test_denied_access_offers_settings() {
        let fake = Arc::new(FakeDialogs::default());
        fake.tap_snackbar_action(true);
        let platform = Arc::new(FakePlatform::default());
        let prompter = SettingsPrompter::new(fake.clone(), platform.clone(), DialogSettings::default());

        let state = prompter
            .open_app_settings_if(|| async { AccessState::Denied }, "Location denied", "Location restricted")
            .await
            .unwrap();

        assert_eq!(state, AccessState::Denied);
        assert_eq!(fake.calls(), vec!["snackbar Location denied [Open Settings] 3000ms"]);
        assert_eq!(platform.settings_opened(), 1);
    }

    #[tokio::test]
    async fn test_restricted_access_without_tap_stays_put() {
        let fake = Arc::new(FakeDialogs::default());
        let platform = Arc::new(FakePlatform::default());
        let prompter = SettingsPrompter::new(fake.clone(), platform.clone(), DialogSettings::default());

        prompter
            .open_app_settings_if(|| async { AccessState::Restricted }, "denied", "restricted")
            .await
            .unwrap();

        assert_eq!(fake.calls(), vec!["snackbar restricted [Open Settings] 3000ms"]);
        assert_eq!(platform.settings_opened(), 0);
    }

    #[tokio::test]
    async fn test_available_access_shows_nothing() {
        let fake = Arc::new(FakeDialogs::default());
        let prompter = SettingsPrompter::new(
            fake.clone(),
            Arc::new(FakePlatform::default()),
            DialogSettings::default(),
        );
        let state = prompter
            .open_app_settings_if(|| async { AccessState::Available }, "denied", "restricted")
            .await
            .unwrap();
        assert_eq!(state, AccessState::Available);
        assert!(fake.calls().is_empty());
    }
}
