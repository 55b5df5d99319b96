//! Media library structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::deserialize_lenient;

/// An uploaded media asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaAsset {
    pub id: String,

    /// Server-relative (`/static/uploads/...`) or absolute URL
    pub url: String,

    pub file_name: String,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub alt_text: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,

    #[serde(default)]
    pub credit: Option<String>,

    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A file to upload with its optional descriptive fields.
#[derive(Debug, Clone, Default)]
pub struct MediaUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub credit: Option<String>,
}

impl MediaUpload {
    /// Create an upload without metadata.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            ..Self::default()
        }
    }

    /// Guess a MIME type from the file extension.
    pub fn guess_mime(&self) -> Option<&'static str> {
        let ext = self.file_name.rsplit_once('.')?.1.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "svg" => Some("image/svg+xml"),
            "mp4" => Some("video/mp4"),
            "pdf" => Some("application/pdf"),
            _ => None,
        }
    }

    /// Non-empty metadata fields as multipart text parts.
    pub fn metadata_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("alt_text", &self.alt_text),
            ("caption", &self.caption),
            ("credit", &self.credit),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (key, v.clone()))
        })
        .collect()
    }
}
