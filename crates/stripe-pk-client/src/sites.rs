//! Shared HTTP client for talking to many sites.

use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::error::ClientError;

/// Default per-request timeout for site tooling.
pub const DEFAULT_SITE_TIMEOUT_SECONDS: u64 = 10;

/// HTTP client used by the verification and push tooling.
#[derive(Debug, Clone)]
pub struct SiteClient {
    pub(crate) client: Client,
}

impl SiteClient {
    /// Create a site client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout_seconds: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client })
    }
}

/// Join a site base URL and an absolute API path.
#[must_use]
pub fn site_url(site: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Parse a sites list: one URL per line, blank lines and `#` comments skipped.
#[must_use]
pub fn parse_sites(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read a sites list from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lists no sites.
pub async fn load_sites(path: impl AsRef<Path>) -> Result<Vec<String>, ClientError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path).await?;
    let sites = parse_sites(&contents);
    if sites.is_empty() {
        return Err(ClientError::Configuration(format!(
            "no sites listed in {}",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), count = sites.len(), "Loaded sites");
    Ok(sites)
}
