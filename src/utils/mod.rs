//! Utility modules for error handling, configuration and display helpers

pub mod bundle_paths;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod format;

// Re-export for convenience
pub use bundle_paths::{
    get_app_support_dir, get_downloads_dir, get_settings_path, resolve_output_dir,
};
pub use config::AppSettings;
pub use error::{FetchError, TikloaderError};
pub use format::{format_date, format_number};
