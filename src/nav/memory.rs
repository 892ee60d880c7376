//! # In-Memory Navigator
//!
//! A [`NavigationEngine`] backed by a route table and a page stack. Used by
//! the demo binary and by tests that need real stack behavior.
//!
//! ```text
//!   navigate(uri)        push page (modal flag, tabs, merged params)
//!   go_back()            pop, unless only the root remains
//!   go_back_to_root()    truncate to the first page
//! ```
//!
//! Unknown routes (including unknown tab children) fail with `no route: <name>`.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use super::engine::NavigationEngine;
use super::outcome::NavigationOutcome;
use super::params::ParameterBag;
use super::uri::NavigationUri;
use crate::core::lock;

#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry {
    pub route: String,
    pub modal: bool,
    pub tabs: Vec<String>,
    pub params: ParameterBag,
}

pub struct StackNavigator {
    routes: HashSet<String>,
    stack: Mutex<Vec<PageEntry>>,
}

impl StackNavigator {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(Into::into).collect(),
            stack: Mutex::new(Vec::new()),
        }
    }

    pub fn stack(&self) -> Vec<PageEntry> {
        lock(&self.stack).clone()
    }

    pub fn current(&self) -> Option<PageEntry> {
        lock(&self.stack).last().cloned()
    }

    /// Route names from root to top.
    pub fn history(&self) -> Vec<String> {
        lock(&self.stack).iter().map(|p| p.route.clone()).collect()
    }

    fn resolve(&self, raw: &str, params: ParameterBag, modal: bool) -> Result<PageEntry, String> {
        let uri = NavigationUri::parse(raw).map_err(|e| e.to_string())?;
        if !self.routes.contains(uri.path()) {
            return Err(format!("no route: {}", uri.path()));
        }
        let tabs: Vec<String> = uri.tabs().into_iter().map(str::to_string).collect();
        if let Some(missing) = tabs.iter().find(|t| !self.routes.contains(t.as_str())) {
            return Err(format!("no route: {missing}"));
        }

        // Query values first so explicit parameters win on lookup.
        let mut merged: ParameterBag = uri
            .params()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        merged.add_range(params.iter().map(|(k, v)| (k.to_string(), v.clone())));

        Ok(PageEntry {
            route: uri.path().to_string(),
            modal,
            tabs,
            params: merged,
        })
    }
}

#[async_trait]
impl NavigationEngine for StackNavigator {
    async fn navigate(
        &self,
        uri: &str,
        params: ParameterBag,
        use_modal: Option<bool>,
        _animated: Option<bool>,
    ) -> NavigationOutcome {
        match self.resolve(uri, params, use_modal.unwrap_or(false)) {
            Ok(page) => {
                debug!("StackNavigator push {}", page.route);
                lock(&self.stack).push(page);
                NavigationOutcome::succeeded()
            }
            Err(cause) => NavigationOutcome::failed(cause),
        }
    }

    async fn go_back(&self, _params: ParameterBag) -> NavigationOutcome {
        let mut stack = lock(&self.stack);
        if stack.len() <= 1 {
            return NavigationOutcome::failed("already at the root page");
        }
        stack.pop();
        NavigationOutcome::succeeded()
    }

    async fn go_back_to_root(&self, _params: ParameterBag) -> NavigationOutcome {
        let mut stack = lock(&self.stack);
        if stack.is_empty() {
            return NavigationOutcome::failed("navigation stack is empty");
        }
        stack.truncate(1);
        NavigationOutcome::succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn navigator() -> StackNavigator {
        StackNavigator::new(["shell", "home", "settings", "details"])
    }

    #[tokio::test]
    async fn test_push_and_pop() {
        let nav = navigator();
        assert!(nav.navigate("home", ParameterBag::new(), None, None).await.success);
        assert!(nav.navigate("details", ParameterBag::new(), Some(true), Some(true)).await.success);
        assert_eq!(nav.history(), vec!["home", "details"]);
        assert!(nav.current().unwrap().modal);

        assert!(nav.go_back(ParameterBag::new()).await.success);
        assert_eq!(nav.history(), vec!["home"]);
        assert!(!nav.go_back(ParameterBag::new()).await.success);
    }

    #[tokio::test]
    async fn test_unknown_route_fails_without_changing_stack() {
        let nav = navigator();
        nav.navigate("home", ParameterBag::new(), None, None).await;
        let outcome = nav.navigate("missing", ParameterBag::new(), None, None).await;
        assert!(!outcome.success);
        assert_eq!(outcome.cause.unwrap().to_string(), "no route: missing");
        assert_eq!(nav.history(), vec!["home"]);
    }

    #[tokio::test]
    async fn test_tabs_and_query_params() {
        let nav = navigator();
        let params = ParameterBag::from([("id", json!(9))]);
        nav.navigate("shell?createTab=home&createTab=settings&id=1", params, None, None)
            .await;
        let page = nav.current().unwrap();
        assert_eq!(page.route, "shell");
        assert_eq!(page.tabs, vec!["home", "settings"]);
        assert_eq!(page.params.get("id"), Some(&json!(9)));
    }

    #[tokio::test]
    async fn test_unknown_tab_fails() {
        let nav = navigator();
        let outcome = nav
            .navigate("shell?createTab=home&createTab=inbox", ParameterBag::new(), None, None)
            .await;
        assert_eq!(outcome.cause.unwrap().to_string(), "no route: inbox");
    }

    #[tokio::test]
    async fn test_back_to_root() {
        let nav = navigator();
        assert!(!nav.go_back_to_root(ParameterBag::new()).await.success);
        for route in ["home", "details", "settings"] {
            nav.navigate(route, ParameterBag::new(), None, None).await;
        }
        assert!(nav.go_back_to_root(ParameterBag::new()).await.success);
        assert_eq!(nav.history(), vec!["home"]);
    }
}
