//! External-process launch strategy
//!
//! Hands the target URL off to a system browser spawned in "app mode" with
//! an isolated user-data directory and the requested user agent. Which
//! browser to use is decided by a [`BrowserLocator`]; the default locator
//! probes a fixed ordered list of well-known executable paths and takes the
//! first hit.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::launch::LaunchRequest;

use super::{LaunchOutcome, Launcher};

/// Capability provider that finds a usable browser executable
pub trait BrowserLocator: Send + Sync {
    /// Path of the first usable browser, if any
    fn locate(&self) -> Option<PathBuf>;
}

/// Locator that probes an ordered list of candidate paths for executability
pub struct KnownPathLocator {
    candidates: Vec<PathBuf>,
}

impl KnownPathLocator {
    /// Create a locator over the given candidate paths
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl BrowserLocator for KnownPathLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .find(|path| is_executable(path))
            .cloned()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Launcher that spawns a separate browser process
pub struct ExternalLauncher {
    locator: Box<dyn BrowserLocator>,
    user_data_dir: PathBuf,
}

impl ExternalLauncher {
    /// Create a launcher over the given locator
    ///
    /// `user_data_dir` defaults to `portal-profile` under the system temp
    /// directory, keeping the spawned browser isolated from the user's
    /// regular profile.
    pub fn new(locator: Box<dyn BrowserLocator>, user_data_dir: Option<PathBuf>) -> Self {
        Self {
            locator,
            user_data_dir: user_data_dir
                .unwrap_or_else(|| std::env::temp_dir().join("portal-profile")),
        }
    }

    /// Create a launcher probing the given candidate paths
    pub fn with_candidates<I, P>(candidates: I, user_data_dir: Option<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(Box::new(KnownPathLocator::new(candidates)), user_data_dir)
    }
}

#[async_trait]
impl Launcher for ExternalLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome> {
        let url = request.url().ok_or(Error::MissingUrl)?;

        let Some(browser) = self.locator.locate() else {
            // Exactly one diagnostic, zero spawn attempts
            error!("{}", Error::BrowserNotFound);
            return Ok(LaunchOutcome::Aborted);
        };

        let mut command = Command::new(&browser);
        command.arg(format!("--user-data-dir={}", self.user_data_dir.display()));
        if let Some(user_agent) = request.user_agent() {
            command.arg(format!("--user-agent={}", user_agent));
        }
        command.arg(format!("--app={}", url));

        info!(browser = %browser.display(), url = %url, "Handing off to external browser");
        match command.spawn() {
            // The child is deliberately not awaited; it outlives the shell
            Ok(_child) => Ok(LaunchOutcome::HandedOff),
            Err(e) => {
                error!(browser = %browser.display(), error = %e, "Failed to spawn browser");
                Ok(LaunchOutcome::Aborted)
            }
        }
    }
}
