//! Error handling for Tikloader

use thiserror::Error;

/// Shown for every transport failure; the cause only goes to the log.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Server error, please try again later";

/// Used when the API reports failure without saying why.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to fetch video data";

/// Main error type for Tikloader plumbing
#[derive(Debug, Error)]
pub enum TikloaderError {
    #[error("Download failed: {0}")]
    DownloadError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// User-facing failure of a metadata lookup.
///
/// Every variant carries the exact text shown to the user. Raw transport
/// errors are never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Empty input or input outside the source platform. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// DNS, connection or unreadable response.
    #[error("{0}")]
    Transport(String),

    /// The API answered but reported `success: false`.
    #[error("{0}")]
    Upstream(String),
}

impl FetchError {
    pub fn transport() -> Self {
        FetchError::Transport(TRANSPORT_FAILURE_MESSAGE.to_string())
    }

    /// Upstream failure carrying the server message verbatim, or the fallback when it is absent or empty
    pub fn upstream(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string());
        FetchError::Upstream(message)
    }

    pub fn reason(&self) -> &str {
        match self {
            FetchError::Validation(m) | FetchError::Transport(m) | FetchError::Upstream(m) => m,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FetchError::Validation(_))
    }
}
