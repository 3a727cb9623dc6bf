//! Configuration types for offline-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Adapter configuration for the remote task-management endpoint
///
/// Supplied once by the embedding application (configuration loading and
/// persistence are the caller's concern). The endpoint URL must already be
/// the full "create offline task" path the remote API expects, e.g.
/// `http://localhost:8000/offline`.
///
/// Both `endpoint_url` and `auth_token` must be non-blank or the adapter is
/// considered unconfigured and rejects all operations before any network I/O.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Full URL of the remote "create offline task" endpoint
    pub endpoint_url: String,

    /// Bearer token sent in the `Authorization` header
    pub auth_token: String,

    /// Destination folder id in the remote storage (None = remote default)
    #[serde(default)]
    pub default_folder_id: Option<String>,

    /// Connect timeout for the HTTP transport (default: 30s)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Per-request timeout; remote task creation may itself be slow (default: 60s)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            auth_token: String::new(),
            default_folder_id: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl AdapterConfig {
    /// Create a configuration with default timeouts and no folder id
    pub fn new(endpoint_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            auth_token: auth_token.into(),
            default_folder_id: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }

    /// Set the default destination folder id
    #[must_use]
    pub fn with_default_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.default_folder_id = Some(folder_id.into());
        self
    }

    /// Validate the configuration invariants
    ///
    /// Checks that endpoint and token are non-blank and that the endpoint
    /// parses as an http/https URL. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_url.trim().is_empty() {
            return Err(Error::Config {
                message: "endpoint URL is blank".into(),
            });
        }
        if self.auth_token.trim().is_empty() {
            return Err(Error::Config {
                message: "auth token is blank".into(),
            });
        }
        let parsed = url::Url::parse(self.endpoint_url.trim()).map_err(|e| Error::Config {
            message: format!("endpoint URL is not parseable: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("endpoint URL scheme '{}' is not http(s)", parsed.scheme()),
            });
        }
        Ok(())
    }
}
