//! Launch request type
//!
//! A [`LaunchRequest`] carries the resolved parameters needed to open a web
//! app: window title, icon source, spoofed user agent, and target URL. It is
//! built either from the command line or from a catalog descriptor, and is
//! immutable once constructed. Any field may be absent; whether an incomplete
//! request is launchable is the launcher's decision, not the parser's.

use serde::{Deserialize, Serialize};

/// Resolved parameters for opening one web app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    title: Option<String>,
    icon: Option<String>,
    user_agent: Option<String>,
    url: Option<String>,
}

impl LaunchRequest {
    /// Create an empty request builder
    pub fn builder() -> LaunchRequestBuilder {
        LaunchRequestBuilder::default()
    }

    /// Window title, if one was supplied
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Icon URL or local path, if one was supplied
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// User agent to present to the target site, if one was supplied
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Target URL, if one was supplied
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Reconstruct the argument vector this request parses from
    ///
    /// `parse_web_app_args` over the result yields an equal request, which is
    /// what makes re-invoking the shell binary with a request lossless.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![crate::args::WEB_APP_MARKER.to_string()];
        if let Some(title) = &self.title {
            args.push("-n".to_string());
            args.push(title.clone());
        }
        if let Some(icon) = &self.icon {
            args.push("-i".to_string());
            args.push(icon.clone());
        }
        if let Some(ua) = &self.user_agent {
            args.push("-u".to_string());
            args.push(ua.clone());
        }
        if let Some(url) = &self.url {
            args.push(url.clone());
        }
        args
    }
}

/// Builder for [`LaunchRequest`]
#[derive(Debug, Clone, Default)]
pub struct LaunchRequestBuilder {
    title: Option<String>,
    icon: Option<String>,
    user_agent: Option<String>,
    url: Option<String>,
}

impl LaunchRequestBuilder {
    /// Set the window title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the icon URL or local path
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the user agent string
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the target URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Build the request
    pub fn build(self) -> LaunchRequest {
        LaunchRequest {
            title: self.title,
            icon: self.icon,
            user_agent: self.user_agent,
            url: self.url,
        }
    }
}

impl LaunchRequestBuilder {
    /// Set the title only if one is present
    pub(crate) fn maybe_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Set the icon only if one is present
    pub(crate) fn maybe_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    /// Set the user agent only if one is present
    pub(crate) fn maybe_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Set the URL only if one is present
    pub(crate) fn maybe_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_all_fields() {
        let req = LaunchRequest::builder()
            .title("Docs")
            .icon("https://example.com/docs.png")
            .user_agent("Mozilla/5.0")
            .url("https://docs.example.com")
            .build();

        assert_eq!(req.title(), Some("Docs"));
        assert_eq!(req.icon(), Some("https://example.com/docs.png"));
        assert_eq!(req.user_agent(), Some("Mozilla/5.0"));
        assert_eq!(req.url(), Some("https://docs.example.com"));
    }

    #[test]
    fn test_empty_request_has_no_fields() {
        let req = LaunchRequest::builder().build();
        assert_eq!(req.title(), None);
        assert_eq!(req.icon(), None);
        assert_eq!(req.user_agent(), None);
        assert_eq!(req.url(), None);
    }

    #[test]
    fn test_to_args_skips_unset_fields() {
        let req = LaunchRequest::builder().url("http://x").build();
        assert_eq!(req.to_args(), vec!["--webAPP", "http://x"]);
    }

    #[test]
    fn test_to_args_full_request() {
        let req = LaunchRequest::builder()
            .title("A")
            .icon("I")
            .user_agent("U")
            .url("http://x")
            .build();
        assert_eq!(
            req.to_args(),
            vec!["--webAPP", "-n", "A", "-i", "I", "-u", "U", "http://x"]
        );
    }
}
