//! Error types for Portal

use thiserror::Error;

/// Result type alias using Portal's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Portal error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Network errors (E100-E199)
    #[error("Network error: {0}. Check your internet connection.")]
    NetworkError(#[from] reqwest::Error),

    #[error("Catalog host returned HTTP {0} for '{1}'")]
    CatalogStatus(u16, String),

    // Launch errors (E300-E399)
    #[error("No usable browser executable found. Run `portal config get launcher.browser_candidates` to see the probe list.")]
    BrowserNotFound,

    #[error("Launch request has no target URL")]
    MissingUrl,

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::NetworkError(_) => "E100",
            Self::CatalogStatus(..) => "E101",
            Self::BrowserNotFound => "E300",
            Self::MissingUrl => "E301",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NetworkError(_) => Some("Check internet connection".to_string()),
            Self::CatalogStatus(..) => Some("portal config get catalog.host".to_string()),
            Self::BrowserNotFound => {
                Some("portal config set launcher.browser_candidates <paths>".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::BrowserNotFound.code(), "E300");
        assert_eq!(Error::MissingUrl.code(), "E301");
        assert_eq!(Error::CatalogStatus(404, "swlist.json".into()).code(), "E101");
        assert_eq!(Error::Other("boom".into()).code(), "E9999");
    }

    #[test]
    fn test_browser_not_found_has_suggestion() {
        let err = Error::BrowserNotFound;
        assert!(err.to_string().contains("browser"));
        assert!(err.suggestion().unwrap().contains("browser_candidates"));
    }

    #[test]
    fn test_catalog_status_display() {
        let err = Error::CatalogStatus(404, "calc.app".into());
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("calc.app"));
    }
}
