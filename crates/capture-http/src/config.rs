//! Connection settings for the Capture API.

use serde::Deserialize;
use thiserror::Error;

/// Seconds to wait for a Capture API response before giving up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Where the Capture API lives and how to authenticate against it.
///
/// `base_url` may carry a path prefix (e.g. `https://host/CaptureAPI/api`),
/// with or without a trailing slash; routes are appended below it.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the Capture API.
    pub base_url: String,
    /// User for Basic authentication.
    pub username: String,
    /// Password for Basic authentication.
    pub password: String,
    /// Per-request timeout. Zero disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Replaces the per-request timeout; zero disables it.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

// The password never reaches logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// A [`ClientConfig`] that cannot produce a working client.
#[derive(Debug, Error)]
pub enum ClientConfigError {
    /// The base URL does not parse or is not an http(s) URL that can carry
    /// route segments.
    #[error("Invalid Capture API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Username or password contains bytes not allowed in a header.
    #[error("Credentials cannot be encoded as a header value")]
    InvalidCredentials,

    /// The underlying HTTP client failed to build.
    #[error("HTTP client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}
