//! Waypoint: view-model lifecycle and navigation orchestration.
//!
//! - [`core`]: streams, scopes, properties, commands, dispatch, config
//! - [`nav`]: parameter bags, outcomes, the navigation gateway
//! - [`services`]: dialogs, localization, connectivity
//! - [`viewmodel`]: the lifecycle contract pages are built on

pub mod core;
pub mod nav;
pub mod services;
pub mod viewmodel;

#[cfg(test)]
pub mod test_support;
