//! Metadata lookup against the third-party downloader API
//!
//! One GET per lookup: `<endpoint>?url=<percent-encoded source URL>`.
//! No retry and no timeout override; the reqwest defaults apply.

use crate::extractor::models::{ApiEnvelope, FetchResult, VideoPayload};
use crate::extractor::traits::Extractor;
use crate::utils::config::AppSettings;
use crate::utils::error::FetchError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Extractor backed by the remote metadata endpoint
pub struct RemoteApiExtractor {
    client: Client,
    endpoint: String,
    source_domain: String,
}

impl RemoteApiExtractor {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(agent) = &settings.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: &AppSettings) -> Self {
        Self {
            client,
            endpoint: settings.api_endpoint.trim().to_string(),
            source_domain: settings.source_domain.clone(),
        }
    }

    /// Full request URL for a source video URL
    pub fn request_url(&self, source_url: &str) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}url={}",
            self.endpoint,
            separator,
            urlencoding::encode(source_url)
        )
    }
}

/// String `message` of a decoded body, if it has one
fn message_of(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_string)
}

/// Map a decoded envelope with `success: true` onto a lookup result
pub fn interpret_envelope(envelope: ApiEnvelope) -> FetchResult {
    if !envelope.success {
        let message = envelope.message();
        warn!("Metadata API reported failure: {:?}", message);
        return Err(FetchError::upstream(message));
    }

    match envelope.data {
        Some(raw) => VideoPayload::from_raw(raw).map_err(|e| {
            error!("Metadata API returned unreadable data: {}", e);
            FetchError::transport()
        }),
        None => {
            warn!("Metadata API reported success without data");
            Err(FetchError::upstream(envelope.message()))
        }
    }
}

/// Map the body of a 2xx response onto a lookup result.
///
/// Only a literal `success: true` counts. Any other body, including one that
/// is not JSON at all, is an upstream failure.
pub fn interpret_body(body: &[u8]) -> FetchResult {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Metadata API answered with a non-JSON body: {}", e);
            return Err(FetchError::upstream(None));
        }
    };

    if value.get("success") != Some(&Value::Bool(true)) {
        let message = message_of(&value);
        warn!("Metadata API reported failure: {:?}", message);
        return Err(FetchError::upstream(message));
    }

    match serde_json::from_slice::<ApiEnvelope>(body) {
        Ok(envelope) => interpret_envelope(envelope),
        Err(e) => {
            warn!("Metadata API envelope did not decode: {}", e);
            Err(FetchError::upstream(message_of(&value)))
        }
    }
}

#[async_trait]
impl Extractor for RemoteApiExtractor {
    fn id(&self) -> &'static str {
        "remote-api"
    }

    fn supports(&self, url: &str) -> bool {
        url.contains(&self.source_domain)
    }

    async fn fetch(&self, url: &str) -> FetchResult {
        let request_url = self.request_url(url);
        debug!("Requesting metadata: {}", request_url);

        let response = match self.client.get(&request_url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching TikTok data: {}", e);
                return Err(FetchError::transport());
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                error!("Error reading metadata response ({}): {}", status, e);
                return Err(FetchError::transport());
            }
        };

        if !status.is_success() {
            // An error status may still carry a message worth showing
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|value| message_of(&value));
            return match message {
                Some(message) => {
                    warn!("Metadata API returned {} with message: {}", status, message);
                    Err(FetchError::upstream(Some(message)))
                }
                None => {
                    error!("Metadata API returned {} without a message", status);
                    Err(FetchError::transport())
                }
            };
        }

        let result = interpret_body(&body);
        if result.is_ok() {
            info!("Fetched metadata for {}", url);
        }
        result
    }
}
