//! Download trigger
//!
//! Hands a `DownloadRequest` to the configured `FileDownloader` and turns
//! whatever happens into a `DownloadOutcome` plus a toast notification.
//! The trigger itself never retries and never lets a failure escape.

use crate::backend::messages::Notification;
use crate::downloader::engine::FileDownloader;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// One click on a download action; consumed immediately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub media_url: String,
    pub suggested_filename: String,
}

impl DownloadRequest {
    pub fn new(media_url: impl Into<String>, suggested_filename: impl Into<String>) -> Self {
        Self {
            media_url: media_url.into(),
            suggested_filename: suggested_filename.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Saved { path: PathBuf },
    Failed { reason: String },
}

impl DownloadOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, DownloadOutcome::Saved { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            DownloadOutcome::Saved { .. } => None,
            DownloadOutcome::Failed { reason } => Some(reason),
        }
    }
}

pub struct DownloadTrigger {
    downloader: Arc<dyn FileDownloader>,
    notifications: Option<mpsc::Sender<Notification>>,
    activation_delay: Duration,
}

impl DownloadTrigger {
    pub fn new(downloader: Arc<dyn FileDownloader>) -> Self {
        Self {
            downloader,
            notifications: None,
            activation_delay: Duration::ZERO,
        }
    }

    pub fn with_notifications(mut self, tx: mpsc::Sender<Notification>) -> Self {
        self.notifications = Some(tx);
        self
    }

    /// Cosmetic pause before the downloader is invoked
    pub fn with_activation_delay(mut self, delay: Duration) -> Self {
        self.activation_delay = delay;
        self
    }

    async fn notify(&self, notification: Notification) {
        if let Some(tx) = &self.notifications {
            if let Err(e) = tx.send(notification).await {
                warn!("Failed to deliver notification: {}", e);
            }
        }
    }

    pub async fn trigger(&self, request: DownloadRequest) -> DownloadOutcome {
        if request.media_url.trim().is_empty() {
            let reason = "No media URL available".to_string();
            self.notify(Notification::DownloadFailed(reason.clone())).await;
            return DownloadOutcome::Failed { reason };
        }

        self.notify(Notification::DownloadStarted {
            filename: request.suggested_filename.clone(),
        })
        .await;

        if !self.activation_delay.is_zero() {
            tokio::time::sleep(self.activation_delay).await;
        }

        let attempt = AssertUnwindSafe(
            self.downloader
                .save(&request.media_url, &request.suggested_filename),
        )
        .catch_unwind()
        .await;

        match attempt {
            Ok(Ok(path)) => {
                info!("Download requested and saved: {:?}", path);
                self.notify(Notification::DownloadSucceeded { path: path.clone() })
                    .await;
                DownloadOutcome::Saved { path }
            }
            Ok(Err(e)) => {
                error!("Download of {} failed: {:#}", request.media_url, e);
                let reason = format!("{:#}", e);
                self.notify(Notification::DownloadFailed(reason.clone())).await;
                DownloadOutcome::Failed { reason }
            }
            Err(_) => {
                error!("Downloader panicked while saving {}", request.media_url);
                let reason = "Download could not be started".to_string();
                self.notify(Notification::DownloadFailed(reason.clone())).await;
                DownloadOutcome::Failed { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDownloader {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl FileDownloader for RecordingDownloader {
        async fn save(&self, url: &str, filename: &str) -> Result<PathBuf> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), filename.to_string()));
            Ok(PathBuf::from("/downloads").join(filename))
        }
    }

    struct FailingDownloader;

    #[async_trait]
    impl FileDownloader for FailingDownloader {
        async fn save(&self, _url: &str, _filename: &str) -> Result<PathBuf> {
            Err(anyhow!("disk full"))
        }
    }

    struct PanickingDownloader;

    #[async_trait]
    impl FileDownloader for PanickingDownloader {
        async fn save(&self, _url: &str, _filename: &str) -> Result<PathBuf> {
            panic!("directive construction blew up");
        }
    }

    #[tokio::test]
    async fn test_success_notifies_and_returns_path() {
        let recorder = Arc::new(RecordingDownloader::default());
        let (tx, mut rx) = mpsc::channel(8);
        let trigger = DownloadTrigger::new(recorder.clone()).with_notifications(tx);

        let outcome = trigger
            .trigger(DownloadRequest::new("https://cdn/a.mp4", "a.mp4"))
            .await;

        assert_eq!(
            outcome,
            DownloadOutcome::Saved {
                path: PathBuf::from("/downloads/a.mp4")
            }
        );
        assert_eq!(
            rx.recv().await,
            Some(Notification::DownloadStarted {
                filename: "a.mp4".to_string()
            })
        );
        assert!(matches!(
            rx.recv().await,
            Some(Notification::DownloadSucceeded { .. })
        ));
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_outcome() {
        let (tx, mut rx) = mpsc::channel(8);
        let trigger = DownloadTrigger::new(Arc::new(FailingDownloader)).with_notifications(tx);

        let outcome = trigger
            .trigger(DownloadRequest::new("https://cdn/a.mp4", "a.mp4"))
            .await;

        assert!(!outcome.is_ok());
        assert_eq!(outcome.reason(), Some("disk full"));
        rx.recv().await; // started
        assert_eq!(
            rx.recv().await,
            Some(Notification::DownloadFailed("disk full".to_string()))
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let trigger = DownloadTrigger::new(Arc::new(PanickingDownloader));
        let outcome = trigger
            .trigger(DownloadRequest::new("https://cdn/a.mp4", "a.mp4"))
            .await;
        assert!(matches!(outcome, DownloadOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_empty_url_never_reaches_downloader() {
        let recorder = Arc::new(RecordingDownloader::default());
        let trigger = DownloadTrigger::new(recorder.clone());

        let outcome = trigger.trigger(DownloadRequest::new("  ", "a.mp4")).await;

        assert!(!outcome.is_ok());
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activation_delay_is_applied() {
        let recorder = Arc::new(RecordingDownloader::default());
        let trigger = DownloadTrigger::new(recorder.clone())
            .with_activation_delay(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let outcome = trigger
            .trigger(DownloadRequest::new("https://cdn/a.mp4", "a.mp4"))
            .await;

        assert!(outcome.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
