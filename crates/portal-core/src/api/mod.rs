//! UI-facing contract
//!
//! The picker UI talks to the dispatcher through a typed request/response
//! surface instead of ad-hoc callback chains: selections come in as
//! [`UiRequest`] values, and the host pushes [`UiEvent`] values back. The
//! transport is injectable, so any front end - or a test - can sit on the
//! other side without a real network or GUI host.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::dispatch::{DispatchOutcome, Dispatcher};

/// Requests a UI layer can make of the host shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiRequest {
    /// `open-app`: dispatch the given catalog entry
    OpenApp { entry_id: String },
    /// `open-solapp`: dispatch the fixed single-entry launch
    OpenSolApp,
}

/// Events the host shell pushes to a UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiEvent {
    /// `apps-data`: the decoded catalog listing, schema untouched
    AppsData { listing: serde_json::Value },
}

/// Route one UI request to the dispatcher
///
/// This is the whole request surface: selections arrive here and nothing
/// else reaches the dispatcher from a UI layer.
pub async fn handle_request(dispatcher: &Dispatcher, request: UiRequest) -> DispatchOutcome {
    match request {
        UiRequest::OpenApp { entry_id } => dispatcher.open_app(&entry_id).await,
        UiRequest::OpenSolApp => dispatcher.open_sol_app().await,
    }
}

/// Host-to-UI event channel
pub trait UiTransport: Send + Sync {
    /// Push the catalog listing to the UI layer
    fn apps_data(&self, listing: serde_json::Value);
}

/// In-process transport over an unbounded tokio channel
///
/// Events pushed after the receiving side is gone are dropped silently,
/// matching the fire-and-forget contract.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelTransport {
    /// Create a transport and the receiver end for the UI
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl UiTransport for ChannelTransport {
    fn apps_data(&self, listing: serde_json::Value) {
        let _ = self.tx.send(UiEvent::AppsData { listing });
    }
}
