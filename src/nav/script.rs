//! # Navigation Scripts
//!
//! A tiny step language for replaying navigation through a gateway:
//!
//! ```text
//!   push:<uri>                  navigate
//!   modal:<uri>                 navigate modally
//!   tabs:<container>:<a,b,...>  navigate to a tabbed container
//!   back                        one step back
//!   root                        back to the root page
//! ```

use std::fmt;
use std::str::FromStr;

use super::gateway::NavigationGateway;
use super::outcome::NavigationError;
use super::params::ParameterBag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Push(String),
    Modal(String),
    Tabs { container: String, pages: Vec<String> },
    Back,
    Root,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParseError(String);

impl fmt::Display for ScriptParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid script step: {}", self.0)
    }
}

impl std::error::Error for ScriptParseError {}

impl FromStr for ScriptStep {
    type Err = ScriptParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ScriptParseError(raw.to_string());
        match raw.split_once(':') {
            None => match raw {
                "back" => Ok(ScriptStep::Back),
                "root" => Ok(ScriptStep::Root),
                _ => Err(invalid()),
            },
            Some(("push", uri)) if !uri.is_empty() => Ok(ScriptStep::Push(uri.to_string())),
            Some(("modal", uri)) if !uri.is_empty() => Ok(ScriptStep::Modal(uri.to_string())),
            Some(("tabs", rest)) => {
                let (container, pages) = rest.split_once(':').ok_or_else(invalid)?;
                let pages: Vec<String> = pages
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
                if container.is_empty() || pages.is_empty() {
                    return Err(invalid());
                }
                Ok(ScriptStep::Tabs {
                    container: container.to_string(),
                    pages,
                })
            }
            Some(_) => Err(invalid()),
        }
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStep::Push(uri) => write!(f, "push:{uri}"),
            ScriptStep::Modal(uri) => write!(f, "modal:{uri}"),
            ScriptStep::Tabs { container, pages } => {
                write!(f, "tabs:{}:{}", container, pages.join(","))
            }
            ScriptStep::Back => write!(f, "back"),
            ScriptStep::Root => write!(f, "root"),
        }
    }
}

impl ScriptStep {
    pub async fn run(&self, gateway: &NavigationGateway) -> Result<(), NavigationError> {
        match self {
            ScriptStep::Push(uri) => gateway.navigate(uri, ParameterBag::new()).await,
            ScriptStep::Modal(uri) => gateway.navigate_modal(uri, ParameterBag::new()).await,
            ScriptStep::Tabs { container, pages } => {
                gateway.navigate_with_tabs(container, pages.as_slice()).await
            }
            ScriptStep::Back => gateway.go_back(false, ParameterBag::new()).await,
            ScriptStep::Root => gateway.go_back(true, ParameterBag::new()).await,
        }
    }
}
