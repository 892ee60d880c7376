//! # Navigation Outcomes
//!
//! Navigation is binary: it fully succeeded, or the initiating operation is
//! aborted with a [`NavigationError`]. [`assert_outcome`] is the only place
//! that turns an engine result into that contract.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use log::error;

pub type NavigationCause = Arc<dyn Error + Send + Sync + 'static>;

/// What the navigation engine reports for one attempt.
#[derive(Debug, Clone)]
pub struct NavigationOutcome {
    pub success: bool,
    pub cause: Option<NavigationCause>,
}

impl NavigationOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            cause: None,
        }
    }

    pub fn failed(cause: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self {
            success: false,
            cause: Some(Arc::from(cause.into())),
        }
    }

    pub fn failed_without_cause() -> Self {
        Self {
            success: false,
            cause: None,
        }
    }
}

/// A navigation or go-back that did not complete.
#[derive(Debug, Clone)]
pub struct NavigationError {
    target: String,
    cause: Option<NavigationCause>,
}

impl NavigationError {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn cause(&self) -> Option<&NavigationCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "navigation failed ({}): {}", self.target, cause),
            None => write!(f, "navigation failed ({})", self.target),
        }
    }
}

impl Error for NavigationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|c| c.as_ref() as &(dyn Error + 'static))
    }
}

/// Return normally on success; otherwise log and raise a [`NavigationError`].
///
/// `target` names the attempted transition (a URI, `back`, `root`) for the
/// log line and error message.
pub fn assert_outcome(outcome: NavigationOutcome, target: &str) -> Result<(), NavigationError> {
    if outcome.success {
        return Ok(());
    }
    match &outcome.cause {
        Some(cause) => error!("[NAV FAIL] {}: {}", target, cause),
        None => error!("[NAV FAIL] {}: no cause reported", target),
    }
    Err(NavigationError {
        target: target.to_string(),
        cause: outcome.cause,
    })
}
