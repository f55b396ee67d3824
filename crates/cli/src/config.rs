//! Settings resolution: an optional TOML file, overridden by flags and
//! environment variables.

use std::path::Path;

use anyhow::{bail, Context};
use capture_http::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;

/// Contents of the optional TOML configuration file.
///
/// ```toml
/// base_url = "https://capture.example.com/CaptureAPI/api"
/// username = "svc-intake"
/// password = "..."
/// timeout_secs = 60
/// log_json = true
/// otlp_endpoint = "http://collector:4317"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_json: Option<bool>,
    pub otlp_endpoint: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file '{}'", path.display()))
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_json: bool,
    pub otlp_endpoint: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Debug)]
pub struct Settings {
    pub client: ClientConfig,
    pub log_json: bool,
    pub otlp_endpoint: Option<String>,
}

/// Merges `overrides` over `file`. The Capture API URL and both credentials
/// are required from one source or the other.
pub fn resolve(overrides: Overrides, file: FileConfig) -> anyhow::Result<Settings> {
    let Some(base_url) = overrides.base_url.or(file.base_url) else {
        bail!("no Capture API URL configured (use --url or base_url)");
    };
    let Some(username) = overrides.username.or(file.username) else {
        bail!("no username configured (use --username or username)");
    };
    let Some(password) = overrides.password.or(file.password) else {
        bail!("no password configured (use --password or password)");
    };
    let timeout_secs = overrides
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(Settings {
        client: ClientConfig::new(base_url, username, password).with_timeout_secs(timeout_secs),
        log_json: overrides.log_json || file.log_json.unwrap_or(false),
        otlp_endpoint: overrides.otlp_endpoint.or(file.otlp_endpoint),
    })
}
