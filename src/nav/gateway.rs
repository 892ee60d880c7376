//! # Navigation Gateway
//!
//! The fail-fast front door to a [`NavigationEngine`]. Every operation builds
//! a fresh [`ParameterBag`], hands it to the engine, and passes the result
//! through [`assert_outcome`]. Callers only ever see `Ok(())` or a
//! [`NavigationError`].
//!
//! The `*_command` constructors wrap the same operations in a [`Command`]
//! so views can bind them directly, optionally gated by a can-execute signal.

use std::sync::Arc;

use log::debug;

use super::engine::NavigationEngine;
use super::outcome::{NavigationError, assert_outcome};
use super::params::ParameterBag;
use super::uri::NavigationUri;
use crate::core::config::{DEFAULT_MODAL_ANIMATED, ResolvedConfig};
use crate::core::{Command, CommandError, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Whether modal presentations are animated.
    pub modal_animated: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            modal_animated: DEFAULT_MODAL_ANIMATED,
        }
    }
}

impl From<&ResolvedConfig> for NavigationOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            modal_animated: config.modal_animated,
        }
    }
}

#[derive(Clone)]
pub struct NavigationGateway {
    engine: Arc<dyn NavigationEngine>,
    options: NavigationOptions,
}

impl NavigationGateway {
    pub fn new(engine: Arc<dyn NavigationEngine>) -> Self {
        Self::with_options(engine, NavigationOptions::default())
    }

    pub fn with_options(engine: Arc<dyn NavigationEngine>, options: NavigationOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> NavigationOptions {
        self.options
    }

    pub async fn navigate(
        &self,
        uri: &str,
        params: impl Into<ParameterBag>,
    ) -> Result<(), NavigationError> {
        let params = params.into();
        debug!("Navigating to {} ({} params)", uri, params.len());
        let outcome = self.engine.navigate(uri, params, None, None).await;
        assert_outcome(outcome, uri)
    }

    pub async fn navigate_modal(
        &self,
        uri: &str,
        params: impl Into<ParameterBag>,
    ) -> Result<(), NavigationError> {
        let params = params.into();
        debug!("Presenting {} modally ({} params)", uri, params.len());
        let outcome = self
            .engine
            .navigate(uri, params, Some(true), Some(self.options.modal_animated))
            .await;
        assert_outcome(outcome, uri)
    }

    pub async fn go_back(
        &self,
        to_root: bool,
        params: impl Into<ParameterBag>,
    ) -> Result<(), NavigationError> {
        let params = params.into();
        let (target, outcome) = if to_root {
            debug!("Going back to root");
            ("root", self.engine.go_back_to_root(params).await)
        } else {
            debug!("Going back");
            ("back", self.engine.go_back(params).await)
        };
        assert_outcome(outcome, target)
    }

    /// Navigate to `container` with one tab per entry of `pages`, in order.
    pub async fn navigate_with_tabs<S: AsRef<str>>(
        &self,
        container: &str,
        pages: &[S],
    ) -> Result<(), NavigationError> {
        let uri = NavigationUri::tabbed(container, pages).to_string();
        self.navigate(&uri, ParameterBag::new()).await
    }

    /// Command that navigates to `uri` with parameters filled in by `build`.
    pub fn navigate_command<F>(&self, uri: &str, build: F, can_execute: Option<Subject<bool>>) -> Command
    where
        F: Fn(&mut ParameterBag) + Send + Sync + 'static,
    {
        self.navigate_command_with(uri, move |(), params| build(params), can_execute)
    }

    /// Command parameterized by its execution argument.
    pub fn navigate_command_with<T, F>(
        &self,
        uri: &str,
        build: F,
        can_execute: Option<Subject<bool>>,
    ) -> Command<T>
    where
        T: Send + 'static,
        F: Fn(T, &mut ParameterBag) + Send + Sync + 'static,
    {
        let gateway = self.clone();
        let uri = uri.to_string();
        Command::gated(
            move |arg| {
                let mut params = ParameterBag::new();
                build(arg, &mut params);
                let gateway = gateway.clone();
                let uri = uri.clone();
                async move {
                    gateway.navigate(&uri, params).await?;
                    Ok::<(), CommandError>(())
                }
            },
            can_execute,
        )
    }

    pub fn modal_command<F>(&self, uri: &str, build: F, can_execute: Option<Subject<bool>>) -> Command
    where
        F: Fn(&mut ParameterBag) + Send + Sync + 'static,
    {
        let gateway = self.clone();
        let uri = uri.to_string();
        Command::gated(
            move |()| {
                let mut params = ParameterBag::new();
                build(&mut params);
                let gateway = gateway.clone();
                let uri = uri.clone();
                async move {
                    gateway.navigate_modal(&uri, params).await?;
                    Ok::<(), CommandError>(())
                }
            },
            can_execute,
        )
    }

    /// Command whose argument is the destination URI.
    pub fn uri_command(&self, can_execute: Option<Subject<bool>>) -> Command<String> {
        let gateway = self.clone();
        Command::gated(
            move |uri: String| {
                let gateway = gateway.clone();
                async move {
                    gateway.navigate(&uri, ParameterBag::new()).await?;
                    Ok::<(), CommandError>(())
                }
            },
            can_execute,
        )
    }

    pub fn go_back_command<F>(&self, to_root: bool, build: F, can_execute: Option<Subject<bool>>) -> Command
    where
        F: Fn(&mut ParameterBag) + Send + Sync + 'static,
    {
        self.go_back_command_with(to_root, move |(), params| build(params), can_execute)
    }

    pub fn go_back_command_with<T, F>(
        &self,
        to_root: bool,
        build: F,
        can_execute: Option<Subject<bool>>,
    ) -> Command<T>
    where
        T: Send + 'static,
        F: Fn(T, &mut ParameterBag) + Send + Sync + 'static,
    {
        let gateway = self.clone();
        Command::gated(
            move |arg| {
                let mut params = ParameterBag::new();
                build(arg, &mut params);
                let gateway = gateway.clone();
                async move {
                    gateway.go_back(to_root, params).await?;
                    Ok::<(), CommandError>(())
                }
            },
            can_execute,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavigationOutcome;
    use crate::test_support::{EngineCall, RecordingEngine};
    use serde_json::json;

    fn gateway(engine: &Arc<RecordingEngine>) -> NavigationGateway {
        NavigationGateway::new(engine.clone())
    }

    #[tokio::test]
    async fn test_navigate_passes_params_and_succeeds() {
        let engine = Arc::new(RecordingEngine::default());
        gateway(&engine)
            .navigate("details", [("id", json!(5)), ("mode", json!("edit"))])
            .await
            .unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            EngineCall::Navigate { uri, params, use_modal, animated } => {
                assert_eq!(uri, "details");
                assert_eq!(params.get("id"), Some(&json!(5)));
                assert_eq!(params.get("mode"), Some(&json!("edit")));
                assert_eq!(*use_modal, None);
                assert_eq!(*animated, None);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_navigate_failure_raises_with_cause() {
        let engine = Arc::new(RecordingEngine::default());
        engine.push_outcome(NavigationOutcome::failed("no route"));

        let err = gateway(&engine)
            .navigate("nowhere", ParameterBag::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no route"));
        assert_eq!(err.target(), "nowhere");
    }

    #[tokio::test]
    async fn test_modal_requests_modal_and_animation() {
        let engine = Arc::new(RecordingEngine::default());
        gateway(&engine)
            .navigate_modal("compose", ParameterBag::new())
            .await
            .unwrap();

        assert!(matches!(
            &engine.calls()[0],
            EngineCall::Navigate { use_modal: Some(true), animated: Some(true), .. }
        ));
    }

    #[tokio::test]
    async fn test_modal_animation_is_configurable() {
        let engine = Arc::new(RecordingEngine::default());
        let gateway = NavigationGateway::with_options(
            engine.clone(),
            NavigationOptions {
                modal_animated: false,
            },
        );
        gateway.navigate_modal("compose", ParameterBag::new()).await.unwrap();
        assert!(matches!(
            &engine.calls()[0],
            EngineCall::Navigate { animated: Some(false), .. }
        ));
    }

    #[tokio::test]
    async fn test_go_back_routes_by_flag() {
        let engine = Arc::new(RecordingEngine::default());
        let gateway = gateway(&engine);
        gateway.go_back(false, [("saved", true)]).await.unwrap();
        gateway.go_back(true, ParameterBag::new()).await.unwrap();

        let calls = engine.calls();
        assert!(matches!(&calls[0], EngineCall::GoBack(p) if p.get("saved") == Some(&json!(true))));
        assert!(matches!(&calls[1], EngineCall::GoBackToRoot(_)));
    }

    #[tokio::test]
    async fn test_go_back_failure_raises() {
        let engine = Arc::new(RecordingEngine::default());
        engine.push_outcome(NavigationOutcome::failed_without_cause());
        let err = gateway(&engine).go_back(true, ParameterBag::new()).await.unwrap_err();
        assert_eq!(err.target(), "root");
    }

    #[tokio::test]
    async fn test_navigate_with_tabs_builds_uri() {
        let engine = Arc::new(RecordingEngine::default());
        gateway(&engine)
            .navigate_with_tabs("shell", &["home", "settings"])
            .await
            .unwrap();
        assert!(matches!(
            &engine.calls()[0],
            EngineCall::Navigate { uri, .. } if uri == "shell?createTab=home&createTab=settings"
        ));
    }

    #[tokio::test]
    async fn test_navigate_command_with_argument() {
        let engine = Arc::new(RecordingEngine::default());
        let command = gateway(&engine).navigate_command_with(
            "profile",
            |user_id: u64, params| {
                params.add("user", user_id);
            },
            None,
        );
        command.execute(17).await.unwrap();
        assert!(matches!(
            &engine.calls()[0],
            EngineCall::Navigate { uri, params, .. } if uri == "profile" && params.get("user") == Some(&json!(17))
        ));
    }

    #[tokio::test]
    async fn test_command_gate_blocks_navigation() {
        let engine = Arc::new(RecordingEngine::default());
        let gate = Subject::replaying(false);
        let command = gateway(&engine).navigate_command("home", |_| {}, Some(gate.clone()));

        assert!(matches!(command.execute(()).await, Err(CommandError::Disabled)));
        assert!(engine.calls().is_empty());

        gate.next(true);
        command.execute(()).await.unwrap();
        assert_eq!(engine.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_command_surfaces_navigation_failure() {
        let engine = Arc::new(RecordingEngine::default());
        engine.push_outcome(NavigationOutcome::failed("no route"));
        let command = gateway(&engine).uri_command(None);

        let err = command.execute("missing".to_string()).await.unwrap_err();
        assert!(matches!(err, CommandError::Navigation(_)));
        assert!(err.to_string().contains("no route"));
    }

    #[tokio::test]
    async fn test_modal_and_back_commands() {
        let engine = Arc::new(RecordingEngine::default());
        let gateway = gateway(&engine);
        gateway
            .modal_command(
                "compose",
                |p| {
                    p.add("draft", 1);
                },
                None,
            )
            .execute(())
            .await
            .unwrap();
        gateway
            .go_back_command_with(
                false,
                |result: String, p| {
                    p.add("result", result);
                },
                None,
            )
            .execute("sent".into())
            .await
            .unwrap();
        gateway.go_back_command(true, |_| {}, None).execute(()).await.unwrap();

        let calls = engine.calls();
        assert!(matches!(&calls[0], EngineCall::Navigate { use_modal: Some(true), .. }));
        assert!(matches!(&calls[1], EngineCall::GoBack(p) if p.get("result") == Some(&json!("sent"))));
        assert!(matches!(&calls[2], EngineCall::GoBackToRoot(_)));
    }
}
