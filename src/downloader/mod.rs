//! Download module: naming, native savers and the trigger

pub mod engine;
pub mod filename;
pub mod progress;
pub mod trigger;

// Re-export for convenience
pub use engine::{DialogFileDownloader, FileDownloader, HttpFileDownloader};
pub use filename::{suggested_filename, CallClock, DownloadVariant};
pub use progress::{DownloadProgress, DownloadStatus};
pub use trigger::{DownloadOutcome, DownloadRequest, DownloadTrigger};
