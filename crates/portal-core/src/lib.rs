//! Portal Core Library
//!
//! This crate provides the core functionality for Portal, including:
//! - Launch argument parsing (`--webAPP` invocation grammar)
//! - Catalog client (app listing + per-entry descriptors)
//! - Catalog-driven dispatch (validated grammar or raw-shell variant)
//! - Launch strategies (embedded window, external browser process)
//! - UI-facing request/response contract with injectable transport
//! - Configuration with TOML file persistence

pub mod api;
pub mod args;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod launch;
pub mod launcher;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::args::parse_web_app_args;
    pub use crate::config::Config;
    pub use crate::dispatch::{DispatchOutcome, Dispatcher};
    pub use crate::error::{Error, Result};
    pub use crate::launch::LaunchRequest;
    pub use crate::launcher::{LaunchOutcome, Launcher};
}
