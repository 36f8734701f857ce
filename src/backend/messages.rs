use std::path::PathBuf;

/// Toast-style notifications sent from the backend to whatever renders them
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    // Lookup
    FetchStarted { url: String },
    FetchSucceeded,
    FetchFailed(String),

    // Download life-cycle
    DownloadStarted { filename: String },
    DownloadSucceeded { path: PathBuf },
    DownloadFailed(String),

    // Clipboard
    LinkCopied,
}

impl Notification {
    /// One-line text suitable for a toast
    pub fn message(&self) -> String {
        match self {
            Notification::FetchStarted { url } => format!("Fetching video data for {url}"),
            Notification::FetchSucceeded => "Video data loaded".to_string(),
            Notification::FetchFailed(reason) => reason.clone(),
            Notification::DownloadStarted { filename } => format!("Downloading {filename}"),
            Notification::DownloadSucceeded { path } => {
                format!("Download complete: {}", path.display())
            }
            Notification::DownloadFailed(reason) => format!("Download failed: {reason}"),
            Notification::LinkCopied => "Link copied to clipboard".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notification::FetchFailed(_) | Notification::DownloadFailed(_)
        )
    }
}
