//! # Services
//!
//! Collaborators a view-model consumes but does not own. Each is a trait so
//! hosts can plug in platform implementations; the concrete types here are
//! the ones the crate ships with.
//!
//! - [`dialogs`]: alerts, prompts, loading indicator, snackbar, settings prompt
//! - [`localize`]: key lookup and the enum key convention
//! - [`connectivity`]: internet availability stream

pub mod connectivity;
pub mod dialogs;
pub mod localize;

pub use connectivity::{Connectivity, ConnectivityMonitor};
pub use dialogs::{
    AccessState, DialogError, DialogSettings, Dialogs, DispatchedDialogs, InputPrompt,
    LoadingHandle, Platform, SettingsPrompter,
};
pub use localize::{Localize, LocalizeExt, MapLocalizer, enum_key};
