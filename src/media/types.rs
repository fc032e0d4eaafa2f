use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Full response envelope returned by the media API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaResponse {
    pub meta: Meta,
    pub data: Vec<MediaItem>,
    pub pagination: Pagination,
}

/// Status block of a response
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub code: u16,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl Default for Meta {
    // A body without a meta block is treated as a success
    fn default() -> Self {
        Self {
            code: 200,
            error_type: None,
            error_message: None,
        }
    }
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.code == 200
    }

    /// Human readable description of a failed response
    pub fn describe(&self) -> String {
        match (&self.error_type, &self.error_message) {
            (Some(kind), Some(message)) => format!("{}: {}", kind, message),
            (None, Some(message)) => message.clone(),
            (Some(kind), None) => kind.clone(),
            (None, None) => format!("code {}", self.code),
        }
    }
}

/// Continuation block of a response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub next_url: Option<String>,
    pub next_max_tag_id: Option<String>,
    pub next_max_id: Option<String>,
}

/// One media record
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaItem {
    pub id: String,

    /// "image" or "video"
    #[serde(rename = "type")]
    pub kind: String,

    /// Public page for the media
    pub link: String,

    pub tags: Vec<String>,

    /// Unix seconds, as sent by the API
    pub created_time: String,

    pub filter: String,
    pub caption: Option<Caption>,
    pub user: MediaUser,
    pub likes: Counter,
    pub comments: Counter,
    pub location: Option<Location>,
    pub images: Images,
}

impl MediaItem {
    /// Creation time; the epoch when the API sent something unparsable
    pub fn created(&self) -> DateTime<Utc> {
        self.created_time
            .parse::<i64>()
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_default()
    }

    pub fn caption_text(&self) -> Option<&str> {
        self.caption.as_ref().map(|caption| caption.text.as_str())
    }

    /// Case-insensitive tag lookup, ignoring a leading '#'
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        self.tags.iter().any(|t| normalize_tag(t) == wanted)
    }
}

pub(crate) fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Caption {
    pub id: String,
    pub text: String,
    pub created_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaUser {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub profile_picture: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Counter {
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Location {
    pub id: Option<serde_json::Value>,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Images {
    pub low_resolution: Image,
    pub standard_resolution: Image,
    pub thumbnail: Image,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}
