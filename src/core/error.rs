//! # Usage Errors
//!
//! Programmer errors: calling a helper in a way that can never work.
//! These are never recovered automatically. They surface to the caller so
//! the defect gets fixed, not retried.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// A write-binding helper was pointed at a read-only (derived) property.
    ReadOnlyProperty(String),
    /// A typed-enum lookup was given something that is not a unit enum variant.
    NotAnEnum(String),
    /// A lifecycle event arrived in a state that does not accept it.
    InvalidTransition { state: String, event: &'static str },
    /// A navigation URI could not be parsed.
    InvalidUri(String),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::ReadOnlyProperty(name) => {
                write!(f, "cannot write property '{name}': it is read-only")
            }
            UsageError::NotAnEnum(type_name) => write!(f, "{type_name} is not an enum"),
            UsageError::InvalidTransition { state, event } => {
                write!(f, "cannot {event} a view-model in state {state}")
            }
            UsageError::InvalidUri(uri) => write!(f, "invalid navigation uri: {uri}"),
        }
    }
}

impl std::error::Error for UsageError {}
