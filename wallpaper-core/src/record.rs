use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// Where the stored image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Random,
    Upload,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Random => "random",
            ImageKind::Upload => "upload",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "random" => Some(ImageKind::Random),
            "upload" => Some(ImageKind::Upload),
            _ => None,
        }
    }

    pub fn from_random_flag(is_random: bool) -> Self {
        if is_random {
            ImageKind::Random
        } else {
            ImageKind::Upload
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete, valid wallpaper record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub blob: Vec<u8>,
    pub timestamp: DateTime<Utc>,
    pub kind: ImageKind,
}

impl StoredImage {
    /// How long ago the image was stored. Negative when the timestamp lies in
    /// the future.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    pub fn timestamp_string(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

/// The three stored fields as they were read, each possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecord {
    pub blob: Option<Vec<u8>>,
    pub timestamp: Option<String>,
    pub kind: Option<String>,
}

impl StoredRecord {
    pub fn is_empty(&self) -> bool {
        self.blob.is_none() && self.timestamp.is_none() && self.kind.is_none()
    }

    /// Validate the record. A missing blob, a missing timestamp or one that
    /// does not parse means there is no usable image. A kind other than
    /// `upload` is handled as a random image.
    pub fn into_image(self) -> Option<StoredImage> {
        let blob = self.blob?;
        let timestamp = parse_timestamp(self.timestamp.as_deref()?)?;
        let kind = self
            .kind
            .as_deref()
            .and_then(ImageKind::from_tag)
            .unwrap_or(ImageKind::Random);

        Some(StoredImage {
            blob,
            timestamp,
            kind,
        })
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            has_image: self.blob.is_some(),
            size_bytes: self.blob.as_ref().map(|b| b.len()).unwrap_or(0),
            timestamp: self.timestamp.clone(),
            kind: self.kind.clone(),
            valid: self.blob.is_some()
                && self.timestamp.as_deref().and_then(parse_timestamp).is_some(),
        }
    }
}

/// Metadata view of a record, without the image bytes.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub has_image: bool,
    pub size_bytes: usize,
    pub timestamp: Option<String>,
    pub kind: Option<String>,
    pub valid: bool,
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
