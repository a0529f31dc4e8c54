use std::env;
use std::time::Duration;

use url::Url;

use crate::error::RemoteError;

pub const DEFAULT_API_URL: &str = "http://localhost:7000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the course and progress API lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `KNOWLEDGEFLOW_API_URL` and `KNOWLEDGEFLOW_API_TIMEOUT_SECS`.
    ///
    /// Unset, blank or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("KNOWLEDGEFLOW_API_URL")
            .and_then(|raw| {
                let raw = raw.trim();
                if raw.is_empty() {
                    return None;
                }
                match Url::parse(raw) {
                    Ok(_) => Some(raw.to_owned()),
                    Err(err) => {
                        tracing::warn!(value = raw, error = %err, "ignoring invalid KNOWLEDGEFLOW_API_URL");
                        None
                    }
                }
            })
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let timeout = lookup("KNOWLEDGEFLOW_API_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Append percent-encoded path segments to the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let invalid = || RemoteError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
