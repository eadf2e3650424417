//! Dashboard configuration, read from a RON file next to the binary's working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use dashboard_engine::ClientSettings;
use dashboard_logging::dashboard_info;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub admin_prefix: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Where display preferences (the theme) are kept.
    pub prefs_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            admin_prefix: client.admin_prefix,
            poll_interval_ms: 3000,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.as_millis() as u64,
            prefs_path: PathBuf::from(".dashboard_prefs.ron"),
        }
    }
}

impl DashboardConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                dashboard_info!("no config at {:?}, using defaults", path);
                Self::default()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {}", path.display()))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.poll_interval_ms > 0, "poll_interval_ms must be positive");
        ensure!(!self.base_url.trim().is_empty(), "base_url must not be empty");
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            admin_prefix: self.admin_prefix.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}
