//! Embedded-window launch strategy
//!
//! Shows a web app inside a window owned by the host shell. Window creation
//! itself - rendering surface, permissive resource-loading policy, user
//! agent override, navigation - belongs to the GUI toolkit and stays behind
//! the [`WindowHost`] trait; this module only prepares the window spec
//! (including the icon temp file) and hands it over.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::launch::LaunchRequest;

use super::{LaunchOutcome, Launcher, download_icon};

/// Everything a window host needs to realize one web-app window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Window title
    pub title: String,
    /// Local path of the downloaded icon, when one could be fetched
    pub icon_path: Option<PathBuf>,
    /// User agent the rendering surface must present
    pub user_agent: Option<String>,
    /// URL to navigate to
    pub url: String,
}

/// Opaque GUI collaborator that owns window creation
///
/// Implementations are expected to create an isolated rendering surface
/// with cross-origin restrictions relaxed for the loaded content, apply the
/// user agent, and navigate to the URL.
pub trait WindowHost: Send + Sync {
    /// Open one window for `spec`
    fn open_window(&self, spec: WindowSpec) -> Result<()>;
}

/// Launcher that opens requests as embedded windows
pub struct EmbeddedLauncher<H: WindowHost> {
    host: H,
    http_client: HttpClient,
}

impl<H: WindowHost> EmbeddedLauncher<H> {
    /// Create a launcher over the given window host
    pub fn new(host: H) -> Self {
        Self {
            host,
            http_client: HttpClient::new(),
        }
    }
}

#[async_trait]
impl<H: WindowHost> Launcher for EmbeddedLauncher<H> {
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome> {
        let url = request.url().ok_or(Error::MissingUrl)?;

        // Icon failures downgrade to "no icon", never abort the launch
        let icon_path = match request.icon() {
            Some(icon_url) => download_icon(&self.http_client, icon_url).await,
            None => None,
        };

        let spec = WindowSpec {
            title: request.title().unwrap_or_default().to_string(),
            icon_path,
            user_agent: request.user_agent().map(str::to_string),
            url: url.to_string(),
        };

        info!(title = %spec.title, url = %spec.url, "Opening embedded window");
        match self.host.open_window(spec) {
            Ok(()) => Ok(LaunchOutcome::Window),
            Err(e) => {
                error!(error = %e, "Window host failed to open window");
                Ok(LaunchOutcome::Aborted)
            }
        }
    }
}
