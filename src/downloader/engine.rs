//! Native file savers
//!
//! A `FileDownloader` takes a direct media URL and a suggested filename and
//! puts the bytes on local disk. The core only sees the trait; the HTTP
//! streamer and the save-dialog variant are two implementations of it.

use crate::downloader::filename::sanitize_filename;
use crate::downloader::progress::DownloadProgress;
use crate::utils::config::AppSettings;
use crate::utils::error::TikloaderError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capability to save a remote file locally
#[async_trait]
pub trait FileDownloader: Send + Sync {
    /// Save `url` under `filename`; returns the final location
    async fn save(&self, url: &str, filename: &str) -> Result<PathBuf>;
}

/// Candidate names tried before giving up on a crowded directory
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Removes a file this download created unless disarmed
struct PartialFileGuard {
    path: PathBuf,
    armed: bool,
}

impl PartialFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed partial file {:?}", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove partial file {:?}: {}", self.path, e),
        }
    }
}

/// `clip.mp4.part`, then `clip.mp4.1.part`, `clip.mp4.2.part`, ...
fn partial_path(final_path: &Path, attempt: u32) -> PathBuf {
    let mut name = final_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    if attempt > 0 {
        name.push(format!(".{}", attempt));
    }
    name.push(".part");
    final_path.with_file_name(name)
}

/// `clip.mp4`, then `clip (1).mp4`, `clip (2).mp4`, ...
fn numbered_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, attempt, ext.to_string_lossy()),
        None => format!("{} ({})", stem, attempt),
    }
}

async fn create_new(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path).await
}

/// Claim an unused name in `dir` by creating it empty.
///
/// The returned guard removes the placeholder unless the download completes.
async fn reserve_path(dir: &Path, filename: &str) -> Result<(PathBuf, PartialFileGuard)> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = dir.join(numbered_name(filename, attempt));
        match create_new(&candidate).await {
            Ok(_) => {
                debug!("Reserved {:?}", candidate);
                let guard = PartialFileGuard::new(candidate.clone());
                return Ok((candidate, guard));
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", candidate.display()))
            }
        }
    }

    Err(TikloaderError::DownloadError(format!(
        "No free file name for {} in {}",
        filename,
        dir.display()
    ))
    .into())
}

/// Open a partial file next to `final_path` that no other download is using
async fn create_partial(final_path: &Path) -> Result<(File, PartialFileGuard)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = partial_path(final_path, attempt);
        match create_new(&candidate).await {
            Ok(file) => return Ok((file, PartialFileGuard::new(candidate))),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", candidate.display()))
            }
        }
    }

    Err(TikloaderError::DownloadError(format!(
        "No free partial file name for {}",
        final_path.display()
    ))
    .into())
}

/// Streams the media URL into the download directory
#[derive(Clone)]
pub struct HttpFileDownloader {
    client: Client,
    output_dir: PathBuf,
    progress_tx: Option<mpsc::Sender<DownloadProgress>>,
}

impl HttpFileDownloader {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(agent) = &settings.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            output_dir: settings.download_location.clone(),
            progress_tx: None,
        })
    }

    /// Report progress on `tx` while streaming
    pub fn with_progress(mut self, tx: mpsc::Sender<DownloadProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn report(&self, progress: &DownloadProgress) {
        if let Some(tx) = &self.progress_tx {
            if let Err(e) = tx.send(progress.clone()).await {
                debug!("Progress receiver gone: {}", e);
            }
        }
    }

    async fn request(&self, url: &str) -> Result<Response> {
        debug!("Requesting media {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(
                TikloaderError::DownloadError(format!("HTTP error: {}", response.status())).into(),
            );
        }
        Ok(response)
    }

    /// Stream `url` to `final_path` through a `.part` file, replacing whatever is there.
    ///
    /// On any failure the `.part` file is removed and `final_path` is left untouched.
    pub async fn download_to_path(&self, url: &str, final_path: &Path) -> Result<PathBuf> {
        let response = self.request(url).await?;
        if let Some(parent) = final_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.write_reported(response, final_path).await
    }

    /// Stream `url` into the output directory under `filename`, or under
    /// `name (n).ext` when that name is taken. Existing files are never replaced.
    pub async fn download_unique(&self, url: &str, filename: &str) -> Result<PathBuf> {
        let response = self.request(url).await?;
        let (final_path, mut reservation) = reserve_path(&self.output_dir, filename).await?;
        let path = self.write_reported(response, &final_path).await?;
        reservation.disarm();
        Ok(path)
    }

    async fn write_reported(&self, response: Response, final_path: &Path) -> Result<PathBuf> {
        let display_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut progress = DownloadProgress::new(display_name, 0);

        match self.write_response(response, final_path, &mut progress).await {
            Ok(path) => {
                progress.complete();
                self.report(&progress).await;
                Ok(path)
            }
            Err(e) => {
                progress.failed(format!("{:#}", e));
                self.report(&progress).await;
                Err(e)
            }
        }
    }

    async fn write_response(
        &self,
        response: Response,
        final_path: &Path,
        progress: &mut DownloadProgress,
    ) -> Result<PathBuf> {
        progress.total_bytes = response.content_length().unwrap_or(0);
        self.report(progress).await;

        let (mut file, mut guard) = create_partial(final_path).await?;
        let part_path = guard.path.clone();
        let mut downloaded = 0u64;

        let start_time = Instant::now();
        let mut last_update_time = start_time;

        // Stream response to file
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            // Update progress every second
            let now = Instant::now();
            if now.duration_since(last_update_time) >= Duration::from_secs(1) {
                let elapsed = now.duration_since(start_time).as_secs_f64();
                let speed = if elapsed > 0.0 {
                    downloaded as f64 / elapsed
                } else {
                    0.0
                };
                progress.update(downloaded, speed);
                self.report(progress).await;
                last_update_time = now;
            }
        }

        file.flush().await?;
        drop(file);

        tokio::fs::rename(&part_path, final_path)
            .await
            .with_context(|| format!("Failed to move download into {}", final_path.display()))?;
        guard.disarm();

        progress.update(downloaded, 0.0);
        info!("Saved {} bytes to {:?}", downloaded, final_path);
        Ok(final_path.to_path_buf())
    }
}

#[async_trait]
impl FileDownloader for HttpFileDownloader {
    async fn save(&self, url: &str, filename: &str) -> Result<PathBuf> {
        self.download_unique(url, &sanitize_filename(filename)).await
    }
}

/// Asks for the destination with the OS save dialog, then streams there
pub struct DialogFileDownloader {
    inner: HttpFileDownloader,
}

impl DialogFileDownloader {
    pub fn new(inner: HttpFileDownloader) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl FileDownloader for DialogFileDownloader {
    async fn save(&self, url: &str, filename: &str) -> Result<PathBuf> {
        let directory = self.inner.output_dir().to_path_buf();
        let suggested = sanitize_filename(filename);

        let chosen = tokio::task::spawn_blocking(move || {
            rfd::FileDialog::new()
                .set_title("Save video")
                .set_directory(directory)
                .set_file_name(suggested)
                .add_filter("MP4 video", &["mp4"])
                .save_file()
        })
        .await
        .context("Save dialog task failed")?;

        let path = chosen
            .ok_or_else(|| TikloaderError::DownloadError("Save cancelled".to_string()))?;
        self.inner.download_to_path(url, &path).await
    }
}
