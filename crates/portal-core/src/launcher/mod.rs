//! Launch strategies
//!
//! A [`Launcher`] realizes a [`LaunchRequest`] as a running browser context.
//! Two mutually exclusive strategies exist:
//!
//! - [`embedded::EmbeddedLauncher`] shows the app inside a window owned by
//!   the host shell, via the opaque [`embedded::WindowHost`] collaborator.
//! - [`external::ExternalLauncher`] hands the URL off to a separately
//!   spawned system browser with an isolated profile.
//!
//! Launch failures never propagate to the user: they are logged and the
//! outcome reports [`LaunchOutcome::Aborted`], with the host process kept
//! running.

pub mod embedded;
pub mod exec;
pub mod external;
mod icon;

pub use icon::download_icon;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::launch::LaunchRequest;

/// Which strategy realizes a launch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherStrategy {
    /// Embedded window owned by the host shell
    Embedded,
    /// Hand-off to a spawned system browser
    #[default]
    External,
}

impl LauncherStrategy {
    /// Convert to string for configuration storage
    pub fn as_str(&self) -> &'static str {
        match self {
            LauncherStrategy::Embedded => "embedded",
            LauncherStrategy::External => "external",
        }
    }

    /// Parse from configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "embedded" => Some(LauncherStrategy::Embedded),
            "external" => Some(LauncherStrategy::External),
            _ => None,
        }
    }
}

/// What a launch attempt produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// An embedded window was opened; the host keeps running
    Window,
    /// An external browser took over; the host may terminate
    HandedOff,
    /// The launch was abandoned; the reason has already been logged
    Aborted,
}

/// Realizes launch requests
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Open `request` as a running browser context
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_roundtrip() {
        for strategy in [LauncherStrategy::Embedded, LauncherStrategy::External] {
            assert_eq!(LauncherStrategy::parse(strategy.as_str()), Some(strategy));
        }
        assert_eq!(LauncherStrategy::parse("popup"), None);
    }

    #[test]
    fn test_default_strategy_is_external() {
        assert_eq!(LauncherStrategy::default(), LauncherStrategy::External);
    }
}
