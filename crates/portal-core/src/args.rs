//! Launch argument parser
//!
//! Decodes the process argument vector into a [`LaunchRequest`] when it
//! matches the direct web-app invocation grammar:
//!
//! ```text
//! <argv0>* --webAPP [-n <title>] [-i <iconURL>] [-u <userAgent>] <url>
//! ```
//!
//! Flags may appear in any order. Unflagged tokens are treated as the target
//! URL; if several appear, the last one wins. Missing fields stay unset and
//! nothing is validated here - a request with no URL is still a request, and
//! the launcher decides what to do with it.

use crate::launch::LaunchRequest;

/// Marker token that selects the direct web-app launch path
pub const WEB_APP_MARKER: &str = "--webAPP";

/// Parse an argument vector into a launch request
///
/// Returns `None` when the marker token is absent, in which case the caller
/// falls back to normal startup (the picker). An optional leading
/// executable-path token before the marker is ignored, so both
/// `["--webAPP", ...]` and `["portal", "--webAPP", ...]` are accepted.
pub fn parse_web_app_args<S: AsRef<str>>(args: &[S]) -> Option<LaunchRequest> {
    let rest = strip_marker(args)?;

    let mut title = None;
    let mut icon = None;
    let mut user_agent = None;
    let mut url = None;

    let mut iter = rest.iter().map(|token| token.as_ref());
    while let Some(token) = iter.next() {
        match token {
            "-n" => title = iter.next().map(str::to_string),
            "-i" => icon = iter.next().map(str::to_string),
            "-u" => user_agent = iter.next().map(str::to_string),
            other => url = Some(other.to_string()),
        }
    }

    Some(
        LaunchRequest::builder()
            .maybe_title(title)
            .maybe_icon(icon)
            .maybe_user_agent(user_agent)
            .maybe_url(url)
            .build(),
    )
}

/// Locate the marker token and return the tokens after it
fn strip_marker<S: AsRef<str>>(args: &[S]) -> Option<&[S]> {
    match args {
        [first, rest @ ..] if first.as_ref() == WEB_APP_MARKER => Some(rest),
        // Leading executable-path token, as delivered by the OS
        [_argv0, second, rest @ ..] if second.as_ref() == WEB_APP_MARKER => Some(rest),
        _ => None,
    }
}
