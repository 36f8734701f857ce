//! Download naming: `{prefix}-{variant}-{timestamp}.mp4`

use crate::extractor::models::VideoPayload;
use chrono::Utc;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Used when a caller passes an empty filename
pub const FALLBACK_FILENAME: &str = "tiktok-video.mp4";

/// Which of the two media URLs to save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DownloadVariant {
    #[default]
    NoWatermark,
    Watermark,
}

impl DownloadVariant {
    pub fn token(self) -> &'static str {
        match self {
            DownloadVariant::NoWatermark => "no-watermark",
            DownloadVariant::Watermark => "watermark",
        }
    }

    /// Media URL for this variant, if the payload carries one
    pub fn media_url(self, payload: &VideoPayload) -> Option<&str> {
        match self {
            DownloadVariant::NoWatermark => payload.nwm_video_url(),
            DownloadVariant::Watermark => payload.wm_video_url(),
        }
    }
}

impl fmt::Display for DownloadVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DownloadVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-watermark" | "nwm" => Ok(DownloadVariant::NoWatermark),
            "watermark" | "wm" => Ok(DownloadVariant::Watermark),
            other => Err(format!(
                "unknown variant '{other}', expected 'no-watermark' or 'watermark'"
            )),
        }
    }
}

/// Millisecond clock read at click time.
///
/// Never returns the same value twice: a read that lands in the same
/// millisecond as the previous one is bumped forward by one.
#[derive(Debug, Default)]
pub struct CallClock {
    last: AtomicI64,
}

impl CallClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_millis(&self) -> i64 {
        self.next_after(Utc::now().timestamp_millis())
    }

    fn next_after(&self, observed: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = observed.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

pub fn suggested_filename(prefix: &str, variant: DownloadVariant, timestamp_ms: i64) -> String {
    format!("{}-{}-{}.mp4", prefix, variant.token(), timestamp_ms)
}

/// Keep only the final path component of a caller-supplied name
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}
