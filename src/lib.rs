//! Tikloader library
//!
//! Looks up a TikTok video through a third-party metadata API and saves
//! either media variant to local disk.

pub mod app;
pub mod backend;
pub mod downloader;
pub mod extractor;
pub mod utils;

/// Display helpers used by the presentation layer
pub mod format {
    pub use crate::utils::format::{format_date, format_number};
}

// Re-export main types for easier use
pub use backend::{AppState, Controller, Notification, Submission};
pub use downloader::{
    DownloadOutcome, DownloadRequest, DownloadTrigger, DownloadVariant, FileDownloader,
    HttpFileDownloader,
};
pub use extractor::{Extractor, FetchResult, RemoteApiExtractor, VideoPayload};
pub use utils::{AppSettings, FetchError, TikloaderError};
