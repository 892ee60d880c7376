//! # View-Models
//!
//! The lifecycle contract pages are built on.
//!
//! ```text
//!   ViewModelContext ──▶ ViewModelCore ◀── core() ── impl ViewModel
//!                          │  ScopeManager (active + destroy)
//!                          │  is_busy ◀── CommandBusyBinder ◀── Command
//!                          │  is_internet_available ◀── Connectivity
//!                          └─ NavigationGateway, Dialogs, Localize
//! ```

pub mod base;
pub mod busy;
pub mod lifecycle;

pub use base::{LifecycleState, ViewModelContext, ViewModelCore};
pub use busy::CommandBusyBinder;
pub use lifecycle::{LifecycleExt, ViewModel};
