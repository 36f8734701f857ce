use crate::extractor::models::FetchResult;
use async_trait::async_trait;

/// Core trait for metadata extractors
///
/// This isolates the application from where the metadata comes from
/// (the remote API, a fixture in tests, ...).
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "remote-api")
    fn id(&self) -> &'static str;

    /// Checks if this extractor can handle the given URL
    fn supports(&self, url: &str) -> bool;

    /// Looks up one video. Exactly one attempt; failures are already
    /// mapped to user-facing messages.
    async fn fetch(&self, url: &str) -> FetchResult;
}
