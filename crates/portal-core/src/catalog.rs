//! Catalog client and descriptor grammar
//!
//! The catalog host is a static file server: `swlist.json` holds the app
//! listing shown by the picker, and each entry id resolves to a small text
//! descriptor. The listing schema is opaque to this crate and forwarded to
//! the UI layer as raw JSON. A descriptor is either a launch line matching
//! the grammar below, or (raw-shell variant) an arbitrary command line.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client as HttpClient;
use tracing::debug;

use crate::config::DEFAULT_CATALOG_HOST;
use crate::error::{Error, Result};
use crate::launch::LaunchRequest;

/// Name of the catalog listing file on the host
pub const LISTING_FILE: &str = "swlist.json";

/// Launch-line grammar for validated descriptors
///
/// `portal --webAPP -n "<title>" -i "<icon>" -u "<ua>" "<url>"` with exactly
/// four quoted capture groups. Anything that does not match, including a
/// line with missing quotes, is treated as "nothing to do".
static LAUNCH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"portal --webAPP -n "([^"]*)" -i "([^"]*)" -u "([^"]*)" "([^"]*)""#)
        .expect("launch-line grammar is a valid regex")
});

/// A descriptor body fetched for one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor(String);

impl Descriptor {
    /// Wrap a fetched descriptor body
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw text, exactly as returned by the host
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Match the body against the launch-line grammar
    ///
    /// Returns the extracted request on a full match, `None` otherwise.
    pub fn parse_launch_line(&self) -> Option<LaunchRequest> {
        let captures = LAUNCH_LINE.captures(&self.0)?;
        Some(
            LaunchRequest::builder()
                .title(&captures[1])
                .icon(&captures[2])
                .user_agent(&captures[3])
                .url(&captures[4])
                .build(),
        )
    }
}

/// HTTP client for the catalog host
///
/// Requests carry no timeout: a slow or hanging host stalls only the code
/// path that awaits it, never the rest of the process.
#[derive(Clone)]
pub struct CatalogClient {
    http_client: HttpClient,
    base_url: String,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for creating a CatalogClient
#[derive(Default)]
pub struct CatalogClientBuilder {
    base_url: Option<String>,
}

impl CatalogClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog host base URL (defaults to the hosted catalog)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the CatalogClient
    pub fn build(self) -> CatalogClient {
        CatalogClient {
            http_client: HttpClient::new(),
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_CATALOG_HOST.to_string()),
        }
    }
}

impl CatalogClient {
    /// Create a client against the default catalog host
    pub fn new() -> Self {
        CatalogClientBuilder::new().build()
    }

    /// Create a client against a specific catalog host
    pub fn with_host(host: impl Into<String>) -> Self {
        CatalogClientBuilder::new().base_url(host).build()
    }

    /// Create a new builder for CatalogClient
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// The catalog host base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the app listing (`swlist.json`)
    ///
    /// The decoded JSON is returned as-is; the schema belongs to the host
    /// and the UI layer, not to this crate.
    pub async fn fetch_listing(&self) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, LISTING_FILE);
        debug!(url = %url, "Fetching catalog listing");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::CatalogStatus(status.as_u16(), LISTING_FILE.into()));
        }

        response.json().await.map_err(Error::NetworkError)
    }

    /// Fetch the descriptor for one catalog entry
    ///
    /// The entry id is opaque and appended to the host URL verbatim; the
    /// host decides what `<id>` or `<id>.app` means.
    pub async fn fetch_descriptor(&self, entry_id: &str) -> Result<Descriptor> {
        let url = format!("{}/{}", self.base_url, entry_id);
        debug!(url = %url, "Fetching catalog descriptor");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::CatalogStatus(status.as_u16(), entry_id.into()));
        }

        let text = response.text().await.map_err(Error::NetworkError)?;
        Ok(Descriptor::new(text))
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults_to_hosted_catalog() {
        let client = CatalogClient::new();
        assert_eq!(client.base_url(), DEFAULT_CATALOG_HOST);
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = CatalogClient::builder()
            .base_url("https://example.com/catalog/")
            .build();
        assert_eq!(client.base_url(), "https://example.com/catalog");
    }

    #[test]
    fn test_client_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CatalogClient>();
    }

    #[test]
    fn test_descriptor_matches_launch_line() {
        let descriptor = Descriptor::new(
            r#"portal --webAPP -n "T" -i "Ic" -u "UA" "Url""#,
        );
        let req = descriptor.parse_launch_line().unwrap();
        assert_eq!(req.title(), Some("T"));
        assert_eq!(req.icon(), Some("Ic"));
        assert_eq!(req.user_agent(), Some("UA"));
        assert_eq!(req.url(), Some("Url"));
    }

    #[test]
    fn test_descriptor_match_anywhere_in_body() {
        let descriptor = Descriptor::new(
            "#!/bin/sh\nportal --webAPP -n \"Calc\" -i \"c.png\" -u \"UA\" \"https://calc.example\"\n",
        );
        let req = descriptor.parse_launch_line().unwrap();
        assert_eq!(req.title(), Some("Calc"));
        assert_eq!(req.url(), Some("https://calc.example"));
    }

    #[test]
    fn test_descriptor_missing_quotes_is_no_match() {
        let descriptor = Descriptor::new(r#"portal --webAPP -n Title -i I -u U "http://x""#);
        assert!(descriptor.parse_launch_line().is_none());
    }

    #[test]
    fn test_descriptor_missing_flag_is_no_match() {
        let descriptor = Descriptor::new(r#"portal --webAPP -n "T" -u "UA" "http://x""#);
        assert!(descriptor.parse_launch_line().is_none());
    }

    #[test]
    fn test_arbitrary_command_is_no_match() {
        let descriptor = Descriptor::new("rm -rf /tmp/cache && echo done");
        assert!(descriptor.parse_launch_line().is_none());
    }

    #[test]
    fn test_empty_captures_are_allowed() {
        let descriptor = Descriptor::new(r#"portal --webAPP -n "" -i "" -u "" """#);
        let req = descriptor.parse_launch_line().unwrap();
        assert_eq!(req.title(), Some(""));
        assert_eq!(req.url(), Some(""));
    }
}
