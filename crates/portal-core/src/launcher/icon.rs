//! Icon download helper
//!
//! Window icons referenced by URL are fetched into the system temp
//! directory before a window opens. The file name is derived from the
//! current timestamp plus the source URL's extension (`.png` when the URL
//! has none). Files are written once and never cleaned up; the temp
//! directory is the cache.

use std::path::PathBuf;

use reqwest::Client as HttpClient;
use tracing::{debug, error};

/// Fetch `icon_url` into a temp file and return its path
///
/// Every failure - bad URL, network error, non-2xx status, write error -
/// is logged and mapped to `None`. A missing icon never blocks a launch.
pub async fn download_icon(http_client: &HttpClient, icon_url: &str) -> Option<PathBuf> {
    match fetch_to_temp(http_client, icon_url).await {
        Ok(path) => {
            debug!(icon = %icon_url, path = %path.display(), "Icon downloaded");
            Some(path)
        }
        Err(e) => {
            error!(icon = %icon_url, error = %e, "Error downloading icon");
            None
        }
    }
}

async fn fetch_to_temp(http_client: &HttpClient, icon_url: &str) -> anyhow::Result<PathBuf> {
    let response = http_client.get(icon_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("icon host returned HTTP {}", status));
    }
    let bytes = response.bytes().await?;

    let path = std::env::temp_dir().join(format!(
        "icon_{}{}",
        chrono::Utc::now().timestamp_millis(),
        extension_of(icon_url)
    ));
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

/// Extension of the URL's final path segment, dot included, `.png` fallback
fn extension_of(url: &str) -> String {
    let last_segment = url.rsplit('/').next().unwrap_or(url);
    match last_segment.rfind('.') {
        Some(pos) if pos + 1 < last_segment.len() => last_segment[pos..].to_string(),
        _ => ".png".to_string(),
    }
}
