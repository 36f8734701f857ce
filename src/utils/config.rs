//! Application configuration

use crate::utils::bundle_paths::get_downloads_dir;
use crate::utils::error::TikloaderError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.ryzendesu.vip/api/downloader/v2/ttdl";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Metadata endpoint; the source URL is appended as `?url=`
    pub api_endpoint: String,

    /// Substring every accepted input URL must contain
    pub source_domain: String,

    /// First token of generated filenames
    pub filename_prefix: String,

    /// Download location
    pub download_location: PathBuf,

    /// Pause before a download is started, in milliseconds (spinner affordance only)
    pub activation_delay_ms: u64,

    /// Optional User-Agent for outbound requests
    pub user_agent: Option<String>,

    /// How long a copied link keeps being served on X11/Wayland, in seconds
    pub clipboard_hold_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            source_domain: "tiktok.com".to_string(),
            filename_prefix: "tiktok".to_string(),
            download_location: get_downloads_dir(),
            activation_delay_ms: 0,
            user_agent: None,
            clipboard_hold_secs: 15,
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: AppSettings = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        let json = serde_json::to_string_pretty(self).map_err(TikloaderError::from)?;
        std::fs::write(path, json).context("Failed to write settings file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), TikloaderError> {
        let endpoint = self.api_endpoint.trim();
        if endpoint.is_empty() {
            return Err(TikloaderError::InvalidSettings(
                "api_endpoint must not be empty".to_string(),
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(TikloaderError::InvalidSettings(format!(
                "api_endpoint must be an http(s) URL, got {endpoint}"
            )));
        }
        if self.source_domain.trim().is_empty() {
            return Err(TikloaderError::InvalidSettings(
                "source_domain must not be empty".to_string(),
            ));
        }
        if self.filename_prefix.trim().is_empty() {
            return Err(TikloaderError::InvalidSettings(
                "filename_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
