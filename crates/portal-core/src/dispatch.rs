//! Catalog dispatcher
//!
//! Turns a user-chosen catalog entry into a launch. The descriptor fetched
//! for the entry is interpreted according to the configured
//! [`DispatchMode`]:
//!
//! - [`DispatchMode::Validated`] matches the body against the launch-line
//!   grammar and launches only on a full match. A non-matching body is
//!   silently "nothing to do".
//! - [`DispatchMode::RawShell`] executes the body verbatim through the
//!   system shell. Both behaviors exist in the legacy catalog ecosystem;
//!   the raw variant survives here strictly as an opt-in.
//!
//! Every operation is fire-and-forget toward the UI: failures are logged
//! and swallowed, and nothing is ever surfaced as a user-visible error.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::api::UiTransport;
use crate::catalog::{CatalogClient, Descriptor};
use crate::error::Result;
use crate::launcher::{LaunchOutcome, Launcher, exec};

/// How fetched descriptors are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Grammar-validated launch lines only
    #[default]
    Validated,
    /// Verbatim shell execution of the descriptor body
    RawShell,
}

impl DispatchMode {
    /// Convert to string for configuration storage
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Validated => "validated",
            DispatchMode::RawShell => "raw-shell",
        }
    }

    /// Parse from configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "validated" => Some(DispatchMode::Validated),
            "raw-shell" => Some(DispatchMode::RawShell),
            _ => None,
        }
    }
}

/// What one dispatch round produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A launch was attempted; the launcher's outcome is attached
    Launched(LaunchOutcome),
    /// The descriptor body was handed to the shell verbatim
    RawExecuted,
    /// Nothing happened; any reason has already been logged
    Nothing,
}

/// Source of catalog listings and descriptors
///
/// The seam that lets dispatch logic run against an in-memory catalog in
/// tests instead of a live host.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the app listing
    async fn listing(&self) -> Result<serde_json::Value>;
    /// Fetch the descriptor for one entry
    async fn descriptor(&self, entry_id: &str) -> Result<Descriptor>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn listing(&self) -> Result<serde_json::Value> {
        self.fetch_listing().await
    }

    async fn descriptor(&self, entry_id: &str) -> Result<Descriptor> {
        self.fetch_descriptor(entry_id).await
    }
}

/// Catalog-driven dispatcher
pub struct Dispatcher {
    catalog: Arc<dyn CatalogSource>,
    launcher: Arc<dyn Launcher>,
    mode: DispatchMode,
    sol_entry: String,
}

impl Dispatcher {
    /// Create a dispatcher over explicit collaborators
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        launcher: Arc<dyn Launcher>,
        mode: DispatchMode,
        sol_entry: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            launcher,
            mode,
            sol_entry: sol_entry.into(),
        }
    }

    /// Dispatch one catalog entry
    ///
    /// Fire-and-forget: fetch failures, grammar mismatches, and launch
    /// failures are logged and folded into the returned outcome.
    pub async fn open_app(&self, entry_id: &str) -> DispatchOutcome {
        let descriptor = match self.catalog.descriptor(entry_id).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                error!(entry = %entry_id, error = %e, "Error opening app");
                return DispatchOutcome::Nothing;
            }
        };

        match self.mode {
            DispatchMode::Validated => {
                let Some(request) = descriptor.parse_launch_line() else {
                    debug!(entry = %entry_id, "Descriptor did not match the launch grammar");
                    return DispatchOutcome::Nothing;
                };
                info!(entry = %entry_id, url = ?request.url(), "Dispatching catalog entry");
                match self.launcher.launch(&request).await {
                    Ok(outcome) => DispatchOutcome::Launched(outcome),
                    Err(e) => {
                        error!(entry = %entry_id, error = %e, "Launch failed");
                        DispatchOutcome::Nothing
                    }
                }
            }
            DispatchMode::RawShell => {
                exec::run_shell_command(descriptor.as_str()).await;
                DispatchOutcome::RawExecuted
            }
        }
    }

    /// Dispatch the fixed single-entry launch
    pub async fn open_sol_app(&self) -> DispatchOutcome {
        let entry = self.sol_entry.clone();
        self.open_app(&entry).await
    }

    /// Fetch the catalog listing once and push it to the UI layer
    ///
    /// Fetch or decode failures are logged and swallowed; the UI simply
    /// receives nothing.
    pub async fn publish_listing(&self, transport: &dyn UiTransport) {
        match self.catalog.listing().await {
            Ok(listing) => {
                info!("Catalog listing fetched");
                transport.apps_data(listing);
            }
            Err(e) => {
                error!(error = %e, "Error fetching app listing");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChannelTransport, UiEvent};
    use crate::error::Error;
    use crate::launch::LaunchRequest;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory catalog keyed by entry id
    struct FakeCatalog {
        listing: Option<serde_json::Value>,
        entries: HashMap<String, String>,
    }

    impl FakeCatalog {
        fn new() -> Self {
            Self {
                listing: Some(serde_json::json!([{ "id": "calc.app", "name": "Calculator" }])),
                entries: HashMap::new(),
            }
        }

        fn with_entry(mut self, id: &str, body: &str) -> Self {
            self.entries.insert(id.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn listing(&self) -> Result<serde_json::Value> {
            self.listing
                .clone()
                .ok_or_else(|| Error::CatalogStatus(404, "swlist.json".into()))
        }

        async fn descriptor(&self, entry_id: &str) -> Result<Descriptor> {
            self.entries
                .get(entry_id)
                .map(|body| Descriptor::new(body.clone()))
                .ok_or_else(|| Error::CatalogStatus(404, entry_id.into()))
        }
    }

    /// Launcher that records requests and always reports a hand-off
    #[derive(Default)]
    struct RecordingLauncher {
        launches: Mutex<Vec<LaunchRequest>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Launcher for RecordingLauncher {
        async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.launches.lock().unwrap().push(request.clone());
            Ok(LaunchOutcome::HandedOff)
        }
    }

    fn dispatcher(
        catalog: FakeCatalog,
        mode: DispatchMode,
    ) -> (Dispatcher, Arc<RecordingLauncher>) {
        let launcher = Arc::new(RecordingLauncher::default());
        let dispatcher = Dispatcher::new(Arc::new(catalog), launcher.clone(), mode, "sol.app");
        (dispatcher, launcher)
    }

    #[tokio::test]
    async fn test_matching_descriptor_launches() {
        let catalog = FakeCatalog::new().with_entry(
            "calc.app",
            r#"portal --webAPP -n "Calc" -i "c.png" -u "UA" "https://calc.example""#,
        );
        let (dispatcher, launcher) = dispatcher(catalog, DispatchMode::Validated);

        let outcome = dispatcher.open_app("calc.app").await;
        assert_eq!(
            outcome,
            DispatchOutcome::Launched(LaunchOutcome::HandedOff)
        );

        let launches = launcher.launches.lock().unwrap();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].title(), Some("Calc"));
        assert_eq!(launches[0].url(), Some("https://calc.example"));
    }

    #[tokio::test]
    async fn test_non_matching_descriptor_launches_nothing() {
        let catalog = FakeCatalog::new().with_entry("calc.app", "echo not a launch line");
        let (dispatcher, launcher) = dispatcher(catalog, DispatchMode::Validated);

        let outcome = dispatcher.open_app("calc.app").await;
        assert_eq!(outcome, DispatchOutcome::Nothing);
        assert_eq!(launcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_entry_is_swallowed() {
        let (dispatcher, launcher) = dispatcher(FakeCatalog::new(), DispatchMode::Validated);

        let outcome = dispatcher.open_app("ghost.app").await;
        assert_eq!(outcome, DispatchOutcome::Nothing);
        assert_eq!(launcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_raw_shell_mode_never_parses() {
        let catalog = FakeCatalog::new().with_entry("calc.app", "true");
        let (dispatcher, launcher) = dispatcher(catalog, DispatchMode::RawShell);

        let outcome = dispatcher.open_app("calc.app").await;
        assert_eq!(outcome, DispatchOutcome::RawExecuted);
        // Raw mode bypasses the launcher entirely
        assert_eq!(launcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_sol_app_uses_fixed_entry() {
        let catalog = FakeCatalog::new().with_entry(
            "sol.app",
            r#"portal --webAPP -n "Sol" -i "s.png" -u "UA" "https://sol.example""#,
        );
        let (dispatcher, launcher) = dispatcher(catalog, DispatchMode::Validated);

        let outcome = dispatcher.open_sol_app().await;
        assert_eq!(
            outcome,
            DispatchOutcome::Launched(LaunchOutcome::HandedOff)
        );
        let launches = launcher.launches.lock().unwrap();
        assert_eq!(launches[0].url(), Some("https://sol.example"));
    }

    #[tokio::test]
    async fn test_publish_listing_forwards_json() {
        let (dispatcher, _) = dispatcher(FakeCatalog::new(), DispatchMode::Validated);
        let (transport, mut rx) = ChannelTransport::new();

        dispatcher.publish_listing(&transport).await;

        let UiEvent::AppsData { listing } = rx.try_recv().unwrap();
        assert_eq!(listing[0]["id"], "calc.app");
    }

    #[tokio::test]
    async fn test_publish_listing_failure_sends_nothing() {
        let catalog = FakeCatalog {
            listing: None,
            entries: HashMap::new(),
        };
        let (dispatcher, _) = dispatcher(catalog, DispatchMode::Validated);
        let (transport, mut rx) = ChannelTransport::new();

        dispatcher.publish_listing(&transport).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_ui_requests_route_to_dispatch() {
        use crate::api::{UiRequest, handle_request};

        let catalog = FakeCatalog::new()
            .with_entry(
                "calc.app",
                r#"portal --webAPP -n "Calc" -i "c.png" -u "UA" "https://calc.example""#,
            )
            .with_entry(
                "sol.app",
                r#"portal --webAPP -n "Sol" -i "s.png" -u "UA" "https://sol.example""#,
            );
        let (dispatcher, launcher) = dispatcher(catalog, DispatchMode::Validated);

        let open = UiRequest::OpenApp {
            entry_id: "calc.app".to_string(),
        };
        handle_request(&dispatcher, open).await;
        handle_request(&dispatcher, UiRequest::OpenSolApp).await;

        let launches = launcher.launches.lock().unwrap();
        assert_eq!(launches.len(), 2);
        assert_eq!(launches[0].title(), Some("Calc"));
        assert_eq!(launches[1].title(), Some("Sol"));
    }

    #[test]
    fn test_mode_roundtrip() {
        for mode in [DispatchMode::Validated, DispatchMode::RawShell] {
            assert_eq!(DispatchMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(DispatchMode::parse("trusting"), None);
    }
}
