//! Runtime configuration for the client.
//!
//! Values resolve in priority order: explicit flag, environment variable,
//! built-in default.
use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "GRIDIRON_API_URL";
pub const STATE_DIR_ENV: &str = "GRIDIRON_STATE_DIR";
/// Filter directives for the log subscriber (same syntax as `RUST_LOG`).
pub const LOG_ENV: &str = "GRIDIRON_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Resolve the backend base URL from `--api-url`, then the environment.
pub fn resolve_api_url(flag: Option<&str>) -> String {
    let env_value = env::var(API_URL_ENV).ok();
    pick_api_url(flag, env_value.as_deref())
}

fn pick_api_url(flag: Option<&str>, env_value: Option<&str>) -> String {
    let chosen = [flag, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty());
    match chosen {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            tracing::debug!("{API_URL_ENV} not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        }
    }
}

/// Resolve where the gate record lives: `--state-dir`, then the environment,
/// then `~/.local/share/gridiron`.
pub fn resolve_state_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env::var_os(STATE_DIR_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let data_dir = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(data_dir.join("gridiron"))
}
