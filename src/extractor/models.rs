//! Data structures for the metadata API

use crate::utils::error::FetchError;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

/// Outcome of one metadata lookup
pub type FetchResult = Result<VideoPayload, FetchError>;

/// Wire shape of the metadata endpoint: `{ success, data?, message? }`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ApiEnvelope {
    /// Server message, when it is a string
    pub fn message(&self) -> Option<String> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Video record returned by the API.
///
/// The record is loosely typed and read-only: the exact JSON text is kept
/// next to a parsed tree, and fields are read by fixed paths. Nothing is
/// validated or stripped.
#[derive(Debug, Clone)]
pub struct VideoPayload {
    raw: Box<RawValue>,
    value: Value,
}

impl PartialEq for VideoPayload {
    fn eq(&self, other: &Self) -> bool {
        self.raw.get() == other.raw.get()
    }
}

impl VideoPayload {
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self, serde_json::Error> {
        let value = serde_json::from_str(raw.get())?;
        Ok(Self { raw, value })
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw = serde_json::value::to_raw_value(&value)?;
        Ok(Self { raw, value })
    }

    /// JSON text exactly as received
    pub fn raw_json(&self) -> &str {
        self.raw.get()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    fn str_at(&self, pointer: &str) -> Option<&str> {
        self.value.pointer(pointer).and_then(Value::as_str)
    }

    /// Caption text, may be empty
    pub fn desc(&self) -> Option<&str> {
        self.str_at("/desc")
    }

    /// Creation time in unix seconds
    pub fn create_time(&self) -> Option<i64> {
        self.value.pointer("/create_time").and_then(Value::as_i64)
    }

    pub fn author_nickname(&self) -> Option<&str> {
        self.str_at("/author/nickname")
    }

    pub fn author_unique_id(&self) -> Option<&str> {
        self.str_at("/author/unique_id")
    }

    /// First avatar URL
    pub fn author_avatar(&self) -> Option<&str> {
        self.str_at("/author/avatar_medium/url_list/0")
    }

    pub fn music_title(&self) -> Option<&str> {
        self.str_at("/music/title")
    }

    pub fn music_author(&self) -> Option<&str> {
        self.str_at("/music/author")
    }

    /// Media URL without the overlay watermark
    pub fn nwm_video_url(&self) -> Option<&str> {
        self.str_at("/video_data/nwm_video_url")
    }

    /// Media URL with the overlay watermark
    pub fn wm_video_url(&self) -> Option<&str> {
        self.str_at("/video_data/wm_video_url")
    }

    /// Unsigned counters found under `statistics`
    pub fn statistics(&self) -> Vec<(&str, u64)> {
        match self.value.pointer("/statistics") {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(key, v)| v.as_u64().map(|n| (key.as_str(), n)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_value() -> Value {
        json!({
            "desc": "sunset run #fyp",
            "create_time": 1_700_000_000,
            "author": {
                "nickname": "Rina",
                "unique_id": "rina.runs",
                "avatar_medium": { "url_list": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"] }
            },
            "music": { "title": "original sound", "author": "Rina" },
            "statistics": { "play_count": 2_500_000, "digg_count": 1_500, "note": "n/a" },
            "video_data": {
                "nwm_video_url": "https://cdn.example.com/nwm.mp4",
                "wm_video_url": "https://cdn.example.com/wm.mp4"
            }
        })
    }

    #[test]
    fn test_fixed_path_accessors() {
        let payload = VideoPayload::from_value(sample_value()).unwrap();
        assert_eq!(payload.desc(), Some("sunset run #fyp"));
        assert_eq!(payload.create_time(), Some(1_700_000_000));
        assert_eq!(payload.author_nickname(), Some("Rina"));
        assert_eq!(payload.author_unique_id(), Some("rina.runs"));
        assert_eq!(payload.author_avatar(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(payload.music_title(), Some("original sound"));
        assert_eq!(payload.music_author(), Some("Rina"));
        assert_eq!(payload.nwm_video_url(), Some("https://cdn.example.com/nwm.mp4"));
        assert_eq!(payload.wm_video_url(), Some("https://cdn.example.com/wm.mp4"));
    }

    #[test]
    fn test_statistics_skip_non_numeric() {
        let payload = VideoPayload::from_value(sample_value()).unwrap();
        let mut stats = payload.statistics();
        stats.sort();
        assert_eq!(stats, vec![("digg_count", 1_500), ("play_count", 2_500_000)]);
    }

    #[test]
    fn test_missing_fields_are_none() {
        let payload = VideoPayload::from_value(json!({ "author": { "avatar_medium": { "url_list": [] } } })).unwrap();
        assert_eq!(payload.desc(), None);
        assert_eq!(payload.author_avatar(), None);
        assert!(payload.statistics().is_empty());
    }

    #[test]
    fn test_raw_text_is_kept_verbatim() {
        let body = r#"{"success":true,"data":{ "desc" : "a",  "extra": [1, 2.50] }}"#;
        let envelope: ApiEnvelope = serde_json::from_str(body).unwrap();
        let payload = VideoPayload::from_raw(envelope.data.unwrap()).unwrap();
        assert_eq!(payload.raw_json(), r#"{ "desc" : "a",  "extra": [1, 2.50] }"#);
        assert_eq!(payload.desc(), Some("a"));
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: ApiEnvelope = serde_json::from_str(r#"{"message": 42}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message(), None);
    }
}
