//! # Navigation
//!
//! Turns a fallible navigation engine into a fail-fast contract.
//!
//! ```text
//!   caller ──▶ NavigationGateway ──ParameterBag──▶ NavigationEngine
//!                     │                                  │
//!                     ◀─────────── NavigationOutcome ─────┘
//!                     │
//!               assert_outcome ──▶ Ok(()) | Err(NavigationError)
//! ```
//!
//! ## Modules
//!
//! - [`params`]: `ParameterBag`, the payload of one navigation
//! - [`outcome`]: `NavigationOutcome` and the single failure policy
//! - [`uri`]: `NavigationUri` and the `createTab` convention
//! - [`engine`]: the `NavigationEngine` collaborator trait
//! - [`gateway`]: `NavigationGateway` and navigation commands
//! - [`memory`]: `StackNavigator`, an in-memory engine
//! - [`script`]: step language used by the demo binary

pub mod engine;
pub mod gateway;
pub mod memory;
pub mod outcome;
pub mod params;
pub mod script;
pub mod uri;

pub use engine::NavigationEngine;
pub use gateway::{NavigationGateway, NavigationOptions};
pub use memory::{PageEntry, StackNavigator};
pub use outcome::{NavigationCause, NavigationError, NavigationOutcome, assert_outcome};
pub use params::ParameterBag;
pub use script::ScriptStep;
pub use uri::{CREATE_TAB, NavigationUri};
