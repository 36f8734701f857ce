//! Progress tracking for downloads

use std::time::Duration;

/// Progress tracking structure
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub filename: String,
    /// 0 when the server sent no Content-Length
    pub total_bytes: u64,
    pub downloaded_bytes: u64,
    pub speed: f64, // bytes per second
    pub eta: Option<Duration>,
    pub status: DownloadStatus,
}

impl DownloadProgress {
    /// Create a new progress tracker
    pub fn new(filename: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            filename: filename.into(),
            total_bytes,
            downloaded_bytes: 0,
            speed: 0.0,
            eta: None,
            status: DownloadStatus::Initializing,
        }
    }

    /// Update progress with new data
    pub fn update(&mut self, downloaded_bytes: u64, speed: f64) {
        self.downloaded_bytes = downloaded_bytes;
        self.speed = speed;
        self.status = DownloadStatus::Downloading;

        if self.total_bytes == 0 {
            self.eta = None;
        } else if self.downloaded_bytes >= self.total_bytes {
            self.eta = Some(Duration::from_secs(0));
        } else if speed > 0.0 {
            let remaining = self.total_bytes - self.downloaded_bytes;
            self.eta = Some(Duration::from_secs_f64((remaining as f64) / speed));
        } else {
            self.eta = None;
        }
    }

    /// Mark as completed
    pub fn complete(&mut self) {
        self.status = DownloadStatus::Completed;
        if self.total_bytes == 0 {
            self.total_bytes = self.downloaded_bytes;
        }
        self.downloaded_bytes = self.total_bytes;
        self.eta = Some(Duration::from_secs(0));
    }

    /// Mark as failed
    pub fn failed(&mut self, error: String) {
        self.status = DownloadStatus::Failed(error);
    }

    /// Get progress percentage (0.0 to 1.0); 0.0 while the size is unknown
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.downloaded_bytes as f64 / self.total_bytes as f64
    }
}

/// Download status
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadStatus {
    #[default]
    Initializing,
    Downloading,
    Completed,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_progress_new() {
        let progress = DownloadProgress::new("tiktok-watermark-1.mp4", 1000);

        assert_eq!(progress.filename, "tiktok-watermark-1.mp4");
        assert_eq!(progress.total_bytes, 1000);
        assert_eq!(progress.downloaded_bytes, 0);
        assert_eq!(progress.eta, None);
        assert!(matches!(progress.status, DownloadStatus::Initializing));
    }

    #[test]
    fn test_update_computes_eta() {
        let mut progress = DownloadProgress::new("a.mp4", 1000);
        progress.update(500, 100.0);

        assert_eq!(progress.status, DownloadStatus::Downloading);
        assert_eq!(progress.eta, Some(Duration::from_secs(5)));
        assert!((progress.percentage() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_unknown_size_has_no_eta() {
        let mut progress = DownloadProgress::new("a.mp4", 0);
        progress.update(4096, 1024.0);

        assert_eq!(progress.eta, None);
        assert_eq!(progress.percentage(), 0.0);
    }

    #[test]
    fn test_complete_fills_unknown_total() {
        let mut progress = DownloadProgress::new("a.mp4", 0);
        progress.update(4096, 1024.0);
        progress.complete();

        assert_eq!(progress.status, DownloadStatus::Completed);
        assert_eq!(progress.total_bytes, 4096);
        assert_eq!(progress.percentage(), 1.0);
    }

    #[test]
    fn test_failed_keeps_message() {
        let mut progress = DownloadProgress::new("a.mp4", 10);
        progress.failed("HTTP error: 403 Forbidden".to_string());

        assert_eq!(
            progress.status,
            DownloadStatus::Failed("HTTP error: 403 Forbidden".to_string())
        );
    }
}
