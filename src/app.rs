//! Command-line flow: look up, preview, save

use crate::backend::{Controller, Notification};
use crate::downloader::{
    DialogFileDownloader, DownloadOutcome, DownloadProgress, DownloadStatus, DownloadVariant,
    FileDownloader, HttpFileDownloader,
};
use crate::extractor::{RemoteApiExtractor, VideoPayload};
use crate::utils::clipboard::get_clipboard_content;
use crate::utils::config::AppSettings;
use crate::utils::format::{format_date, format_number};
use anyhow::{anyhow, Result};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What the user asked for on the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Source video URL; read from the clipboard when absent
    pub url: Option<String>,
    pub variant: DownloadVariant,
    /// Preview only
    pub info_only: bool,
    /// Pick the destination with the OS save dialog
    pub ask: bool,
    /// Copy the no-watermark link to the clipboard
    pub copy: bool,
    /// Open the download folder afterwards
    pub reveal: bool,
}

/// Text preview of a fetched video
pub fn render_preview(payload: &VideoPayload) -> String {
    let mut out = String::new();
    let nickname = payload.author_nickname().unwrap_or("-");
    let handle = payload.author_unique_id().unwrap_or("-");
    let _ = writeln!(out, "Author:       {} (@{})", nickname, handle);

    match payload.desc() {
        Some(desc) if !desc.trim().is_empty() => {
            let _ = writeln!(out, "Caption:      {}", desc.trim());
        }
        _ => {
            let _ = writeln!(out, "Caption:      (none)");
        }
    }

    let _ = writeln!(
        out,
        "Music:        {} - {}",
        payload.music_title().unwrap_or("-"),
        payload.music_author().unwrap_or("-")
    );

    if let Some(created) = payload.create_time() {
        let _ = writeln!(out, "Posted:       {}", format_date(created));
    }

    let stats = payload.statistics();
    if !stats.is_empty() {
        let rendered: Vec<String> = stats
            .iter()
            .map(|(name, n)| format!("{} {}", name.replace('_', " "), format_number(*n)))
            .collect();
        let _ = writeln!(out, "Stats:        {}", rendered.join(", "));
    }

    if let Some(avatar) = payload.author_avatar() {
        let _ = writeln!(out, "Avatar:       {}", avatar);
    }
    let _ = writeln!(out, "No watermark: {}", payload.nwm_video_url().unwrap_or("-"));
    let _ = write!(out, "Watermark:    {}", payload.wm_video_url().unwrap_or("-"));
    out
}

/// One console line for a progress update, if it is worth printing
pub fn progress_line(progress: &DownloadProgress) -> Option<String> {
    match &progress.status {
        DownloadStatus::Downloading if progress.total_bytes > 0 => {
            let eta = progress
                .eta
                .map(|eta| format!(", {}s left", eta.as_secs()))
                .unwrap_or_default();
            Some(format!(
                "  {:.1}% of {} at {:.2} MB/s{}",
                progress.percentage() * 100.0,
                progress.filename,
                progress.speed / 1024.0 / 1024.0,
                eta
            ))
        }
        DownloadStatus::Downloading => Some(format!(
            "  {} bytes of {}",
            progress.downloaded_bytes, progress.filename
        )),
        DownloadStatus::Completed => Some(format!("  {} bytes written", progress.downloaded_bytes)),
        DownloadStatus::Initializing | DownloadStatus::Failed(_) => None,
    }
}

fn print_notification(notification: &Notification) {
    if notification.is_error() {
        eprintln!("✗ {}", notification.message());
    } else {
        println!("• {}", notification.message());
    }
}

/// Run one lookup and, unless `info_only`, one download
pub async fn run(settings: AppSettings, options: RunOptions) -> Result<()> {
    settings.validate()?;

    let url = match options.url.clone() {
        Some(url) => url,
        None => {
            let pasted = get_clipboard_content().map_err(|e| anyhow!(e))?;
            debug!("Using URL from clipboard: {}", pasted);
            pasted
        }
    };

    let (progress_tx, mut progress_rx) = mpsc::channel::<DownloadProgress>(100);
    let (notify_tx, mut notify_rx) = mpsc::channel::<Notification>(32);

    let progress_task = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            if let Some(line) = progress_line(&progress) {
                println!("{}", line);
            }
        }
    });
    let notify_task = tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            print_notification(&notification);
        }
    });

    let http = HttpFileDownloader::new(&settings)?.with_progress(progress_tx);
    let downloader: Arc<dyn FileDownloader> = if options.ask {
        Arc::new(DialogFileDownloader::new(http))
    } else {
        Arc::new(http)
    };
    let extractor = Arc::new(RemoteApiExtractor::new(&settings)?);
    let controller =
        Controller::new(settings, extractor, downloader).with_notifications(notify_tx);

    let result = drive(&controller, &url, &options).await;

    // Close the channels so the printers drain and stop
    drop(controller);
    let _ = notify_task.await;
    let _ = progress_task.await;

    let outcome = result?;
    if let (true, Some(DownloadOutcome::Saved { path })) = (options.reveal, &outcome) {
        if let Some(dir) = path.parent() {
            if let Err(e) = open::that(dir) {
                warn!("Failed to open {:?}: {}", dir, e);
            }
        }
    }
    Ok(())
}

async fn drive(
    controller: &Controller,
    url: &str,
    options: &RunOptions,
) -> Result<Option<DownloadOutcome>> {
    let payload = controller
        .submit_url(url)
        .await
        .map_err(|e| anyhow!(e.reason().to_string()))?;

    println!("{}", render_preview(&payload));

    // The copy keeps serving the link while the download runs
    let copy = async {
        if !options.copy {
            return;
        }
        println!(
            "Copying the no-watermark link (kept for up to {}s)",
            controller.settings().clipboard_hold_secs
        );
        if let Err(e) = controller.copy_link().await {
            warn!("Copy failed: {}", e);
        }
    };
    let download = async {
        if options.info_only {
            None
        } else {
            Some(controller.request_download(options.variant).await)
        }
    };
    let ((), outcome) = tokio::join!(copy, download);

    match outcome {
        Some(DownloadOutcome::Failed { reason }) => Err(anyhow!(reason)),
        outcome => Ok(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_preview_full() {
        let payload = VideoPayload::from_value(json!({
            "desc": "  sunset run  ",
            "create_time": 0,
            "author": {
                "nickname": "Rina",
                "unique_id": "rina.runs",
                "avatar_medium": { "url_list": ["https://cdn.example.com/a.jpg"] }
            },
            "music": { "title": "original sound", "author": "Rina" },
            "statistics": { "play_count": 2_500_000 },
            "video_data": {
                "nwm_video_url": "https://cdn.example.com/nwm.mp4",
                "wm_video_url": "https://cdn.example.com/wm.mp4"
            }
        }))
        .unwrap();

        let preview = render_preview(&payload);
        assert!(preview.contains("Author:       Rina (@rina.runs)"));
        assert!(preview.contains("Caption:      sunset run\n"));
        assert!(preview.contains("Music:        original sound - Rina"));
        assert!(preview.contains("Posted:       1 Januari 1970"));
        assert!(preview.contains("play count 2.5M"));
        assert!(preview.ends_with("Watermark:    https://cdn.example.com/wm.mp4"));
    }

    #[test]
    fn test_progress_line_shows_time_left() {
        let mut progress = DownloadProgress::new("clip.mp4", 10 * 1024 * 1024);
        progress.update(5 * 1024 * 1024, 1024.0 * 1024.0);

        let line = progress_line(&progress).expect("line");
        assert_eq!(line, "  50.0% of clip.mp4 at 1.00 MB/s, 5s left");

        progress.failed("cut".to_string());
        assert_eq!(progress_line(&progress), None);
    }

    #[test]
    fn test_render_preview_sparse() {
        let payload = VideoPayload::from_value(json!({ "desc": "" })).unwrap();
        let preview = render_preview(&payload);
        assert!(preview.contains("Caption:      (none)"));
        assert!(!preview.contains("Posted:"));
        assert!(!preview.contains("Stats:"));
        assert!(preview.contains("No watermark: -"));
    }
}
