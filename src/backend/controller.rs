//! Application controller
//!
//! Owns the single "current video" slot and is the only writer of it.
//! Every lookup is tagged with a sequence number; a result is applied only
//! if no newer submit or input edit happened while it was in flight.

use super::messages::Notification;
use crate::downloader::{
    suggested_filename, CallClock, DownloadOutcome, DownloadRequest, DownloadTrigger,
    DownloadVariant, FileDownloader, HttpFileDownloader,
};
use crate::extractor::{validate_source_url, Extractor, FetchResult, RemoteApiExtractor, VideoPayload};
use crate::utils::clipboard::set_clipboard_content;
use crate::utils::config::AppSettings;
use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

/// What the presentation layer renders
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub input: String,
    pub current: Option<Arc<VideoPayload>>,
    pub error: Option<String>,
    pub loading: bool,
}

/// Result of one submit, with its fencing information
#[derive(Debug)]
pub struct Submission {
    pub sequence: u64,
    pub result: FetchResult,
    /// False when a newer request superseded this one; the state was left alone
    pub is_current: bool,
}

pub struct Controller {
    settings: AppSettings,
    extractor: Arc<dyn Extractor>,
    trigger: DownloadTrigger,
    clock: CallClock,
    sequence: AtomicU64,
    state: RwLock<AppState>,
    notifications: Option<mpsc::Sender<Notification>>,
}

impl Controller {
    pub fn new(
        settings: AppSettings,
        extractor: Arc<dyn Extractor>,
        downloader: Arc<dyn FileDownloader>,
    ) -> Self {
        let trigger = DownloadTrigger::new(downloader)
            .with_activation_delay(Duration::from_millis(settings.activation_delay_ms));

        Self {
            settings,
            extractor,
            trigger,
            clock: CallClock::new(),
            sequence: AtomicU64::new(0),
            state: RwLock::new(AppState::default()),
            notifications: None,
        }
    }

    /// Wire the remote extractor and the HTTP downloader from settings
    pub fn from_settings(settings: AppSettings) -> Result<Self> {
        settings.validate()?;
        let extractor = Arc::new(RemoteApiExtractor::new(&settings)?);
        let downloader = Arc::new(HttpFileDownloader::new(&settings)?);
        Ok(Self::new(settings, extractor, downloader))
    }

    pub fn with_notifications(mut self, tx: mpsc::Sender<Notification>) -> Self {
        self.trigger = self.trigger.with_notifications(tx.clone());
        self.notifications = Some(tx);
        self
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    async fn notify(&self, notification: Notification) {
        if let Some(tx) = &self.notifications {
            if let Err(e) = tx.send(notification).await {
                warn!("Failed to deliver notification: {}", e);
            }
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn current(&self) -> Option<Arc<VideoPayload>> {
        self.state.read().await.current.clone()
    }

    /// The user edited the input: drop the shown result and fence off in-flight lookups
    pub async fn input_changed(&self, raw: &str) {
        let mut state = self.state.write().await;
        self.sequence.fetch_add(1, Ordering::AcqRel);
        state.input = raw.to_string();
        state.current = None;
        state.error = None;
        state.loading = false;
    }

    /// Validate and look up `raw`; see `submit` for fencing details
    pub async fn submit_url(&self, raw: &str) -> FetchResult {
        self.submit(raw).await.result
    }

    pub async fn submit(&self, raw: &str) -> Submission {
        let (sequence, validated) = {
            let mut state = self.state.write().await;
            let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;
            state.input = raw.to_string();
            state.current = None;

            match validate_source_url(raw, &self.settings.source_domain) {
                Ok(url) => {
                    state.error = None;
                    state.loading = true;
                    (sequence, Ok(url.to_string()))
                }
                Err(e) => {
                    state.error = Some(e.reason().to_string());
                    state.loading = false;
                    (sequence, Err(e))
                }
            }
        };

        let url = match validated {
            Ok(url) => url,
            Err(e) => {
                debug!("Rejected input before lookup: {}", e);
                self.notify(Notification::FetchFailed(e.reason().to_string()))
                    .await;
                return Submission {
                    sequence,
                    result: Err(e),
                    is_current: true,
                };
            }
        };

        self.notify(Notification::FetchStarted { url: url.clone() }).await;
        debug!("Lookup #{} via {}", sequence, self.extractor.id());
        let result = self.extractor.fetch(&url).await;

        let is_current = {
            let mut state = self.state.write().await;
            if self.sequence.load(Ordering::Acquire) == sequence {
                state.loading = false;
                match &result {
                    Ok(payload) => {
                        state.current = Some(Arc::new(payload.clone()));
                        state.error = None;
                    }
                    Err(e) => {
                        state.current = None;
                        state.error = Some(e.reason().to_string());
                    }
                }
                true
            } else {
                info!("Discarding stale lookup #{} for {}", sequence, url);
                false
            }
        };

        if is_current {
            let notification = match &result {
                Ok(_) => Notification::FetchSucceeded,
                Err(e) => Notification::FetchFailed(e.reason().to_string()),
            };
            self.notify(notification).await;
        }

        Submission {
            sequence,
            result,
            is_current,
        }
    }

    /// Download one variant of the current video under a fresh timestamped name
    pub async fn request_download(&self, variant: DownloadVariant) -> DownloadOutcome {
        let Some(payload) = self.current().await else {
            return self.fail_download("No video loaded").await;
        };
        let Some(media_url) = variant.media_url(&payload) else {
            return self
                .fail_download(&format!("Video data has no {} URL", variant))
                .await;
        };

        let filename = suggested_filename(
            &self.settings.filename_prefix,
            variant,
            self.clock.now_millis(),
        );
        self.trigger
            .trigger(DownloadRequest::new(media_url, filename))
            .await
    }

    /// Download an arbitrary media URL under `filename`
    pub async fn request_download_url(&self, media_url: &str, filename: &str) -> DownloadOutcome {
        self.trigger
            .trigger(DownloadRequest::new(media_url, filename))
            .await
    }

    async fn fail_download(&self, reason: &str) -> DownloadOutcome {
        warn!("Download refused: {}", reason);
        self.notify(Notification::DownloadFailed(reason.to_string()))
            .await;
        DownloadOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    /// Copy the no-watermark URL of the current video to the clipboard.
    ///
    /// Resolves once the link has been served for `clipboard_hold_secs` or
    /// another program replaced it.
    pub async fn copy_link(&self) -> Result<String, String> {
        let payload = self
            .current()
            .await
            .ok_or_else(|| "No video loaded".to_string())?;
        let url = payload
            .nwm_video_url()
            .ok_or_else(|| "Video data has no no-watermark URL".to_string())?
            .to_string();

        let hold = Duration::from_secs(self.settings.clipboard_hold_secs);
        let text = url.clone();
        tokio::task::spawn_blocking(move || set_clipboard_content(&text, hold))
            .await
            .map_err(|e| format!("Clipboard task failed: {}", e))??;

        self.notify(Notification::LinkCopied).await;
        Ok(url)
    }
}
