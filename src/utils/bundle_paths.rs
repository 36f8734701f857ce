//! Platform path resolution
//!
//! All paths are resolved to absolute locations. A process started from a
//! desktop launcher may have `/` as its working directory, so relative
//! paths such as `./downloads` are never returned.

use std::path::{Path, PathBuf};
use path_absolutize::Absolutize;
use tracing::{debug, warn};

/// Get the configuration directory for Tikloader.
///
/// Returns: `<platform config dir>/tikloader/`
pub fn get_app_support_dir() -> PathBuf {
    let dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(std::env::temp_dir)
        .join("tikloader");

    debug!("App support directory: {:?}", dir);
    dir
}

/// Get the settings file path.
///
/// Returns: `<platform config dir>/tikloader/settings.json`
pub fn get_settings_path() -> PathBuf {
    get_app_support_dir().join("settings.json")
}

/// Get the downloads directory.
///
/// Falls back to ~/Downloads, then to the system temp directory.
pub fn get_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| {
            warn!("Could not determine Downloads directory, using temp dir");
            std::env::temp_dir()
        })
}

/// Resolve a user-supplied directory against the current working directory
pub fn resolve_output_dir(dir: &Path) -> PathBuf {
    match dir.absolutize() {
        Ok(abs) => abs.into_owned(),
        Err(e) => {
            warn!("Failed to absolutize {:?}: {}", dir, e);
            dir.to_path_buf()
        }
    }
}
