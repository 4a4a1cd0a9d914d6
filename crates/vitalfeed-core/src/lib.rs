//! # vitalfeed-core
//!
//! Core types for the Vitalfeed health education video feed.
//!
//! This crate holds the pieces of the feed that carry real behavior and no I/O:
//!
//! - [`ContentRecord`] - A displayable item (video, article) supplied by a content source
//! - [`ContentSource`] - The collaborator trait that supplies records in display order
//! - [`freshness`] - "Updated X ago" labels for records
//! - [`media`] - Thumbnail degradation, embed URLs and single-active-player playback

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod freshness;
pub mod media;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Duplicate record id: {0}")]
    DuplicateRecord(String),

    #[error("Content source error: {0}")]
    Source(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

// ============================================================================
// Core ID Types
// ============================================================================

/// Stable identity key of a content record, e.g. "hands-only-cpr".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Content Records
// ============================================================================

/// The kind of a content record. Only [`ContentKind::Video`] is playable.
///
/// Serialized as the lower-case tag used by catalogs (`"video"`, `"article"`);
/// unknown tags are preserved in [`ContentKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentKind {
    Video,
    Article,
    Other(String),
}

impl From<String> for ContentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "video" => ContentKind::Video,
            "article" => ContentKind::Article,
            _ => ContentKind::Other(tag),
        }
    }
}

impl From<ContentKind> for String {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Video => "video".to_string(),
            ContentKind::Article => "article".to_string(),
            ContentKind::Other(tag) => tag,
        }
    }
}

/// One displayable item of the feed.
///
/// Field names on the wire follow the catalog format (`videoId`, `mediaUrl`,
/// `thumbnail`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// External video identifier used to build an embed URL.
    #[serde(rename = "videoId", default, skip_serializing_if = "Option::is_none")]
    pub primary_media_ref: Option<String>,
    /// Direct media URL, only consulted when `primary_media_ref` is absent.
    #[serde(rename = "mediaUrl", default, skip_serializing_if = "Option::is_none")]
    pub legacy_media_url: Option<String>,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `None` when the catalog timestamp was missing or unparsable.
    #[serde(rename = "updatedAt", default, with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Where a video record's playable media comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource<'a> {
    /// Provider media reference, rendered through an embed URL
    Embedded(&'a str),
    /// Direct media URL (older catalog entries)
    Direct(&'a str),
}

impl ContentRecord {
    /// Create a video record backed by a provider media reference.
    pub fn video(
        id: impl Into<String>,
        title: impl Into<String>,
        media_ref: impl Into<String>,
        thumbnail_url: impl Into<String>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: RecordId::new(id),
            kind: ContentKind::Video,
            title: title.into(),
            excerpt: String::new(),
            primary_media_ref: Some(media_ref.into()),
            legacy_media_url: None,
            thumbnail_url: thumbnail_url.into(),
            tags: Vec::new(),
            updated_at,
            channel: None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == ContentKind::Video
    }

    /// The media this record plays, preferring the provider reference.
    pub fn media_source(&self) -> Option<MediaSource<'_>> {
        if let Some(media_ref) = self.primary_media_ref.as_deref() {
            return Some(MediaSource::Embedded(media_ref));
        }
        self.legacy_media_url.as_deref().map(MediaSource::Direct)
    }

    /// Whether a play action may activate this record.
    pub fn is_playable(&self) -> bool {
        self.is_video() && self.media_source().is_some()
    }
}

/// Serde adapter for catalog timestamps that never fails the surrounding load.
///
/// Accepts the formats understood by [`freshness::parse_timestamp`] and epoch
/// milliseconds; anything else deserializes to `None`.
mod lenient_timestamp {
    use super::freshness::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
        Other(IgnoredAny),
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
            Some(RawTimestamp::Millis(millis)) => DateTime::from_timestamp_millis(millis),
            Some(RawTimestamp::Other(_)) | None => None,
        })
    }
}

// ============================================================================
// Content Source Trait
// ============================================================================

/// Supplies the ordered, read-only sequence of records shown by the feed.
///
/// Record order is display order. Sources are loaded once per session.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Unique identifier for this source (e.g., "curated", "json")
    fn id(&self) -> &'static str;

    /// Human-readable name for display
    fn name(&self) -> &'static str;

    /// Load every record in display order
    async fn load(&self) -> Result<Vec<ContentRecord>>;
}

// ============================================================================
// Re-exports
// ============================================================================

pub mod prelude {
    pub use crate::freshness::{format_relative_time, format_relative_time_opt, AgeTier};
    pub use crate::media::{
        DegradationLevel, MediaResolver, MediaSettings, PlaybackSession, Visual,
    };
    pub use crate::{
        ContentError, ContentKind, ContentRecord, ContentSource, MediaSource, RecordId, Result,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CATALOG_ENTRY: &str = r#"{
        "id": "hands-only-cpr",
        "type": "video",
        "title": "Hands-Only CPR Instruction",
        "excerpt": "Learn the two simple steps to save a life.",
        "videoId": "M4ACYp75mjU",
        "thumbnail": "https://img.youtube.com/vi/M4ACYp75mjU/maxresdefault.jpg",
        "tags": ["Emergency Care", "First Aid"],
        "updatedAt": "2024-11-15T10:00:00.000Z",
        "channel": "American Heart Association"
    }"#;

    #[test]
    fn test_deserialize_catalog_entry() {
        let record: ContentRecord = serde_json::from_str(CATALOG_ENTRY).unwrap();
        assert_eq!(record.id, RecordId::from("hands-only-cpr"));
        assert_eq!(record.kind, ContentKind::Video);
        assert_eq!(record.primary_media_ref.as_deref(), Some("M4ACYp75mjU"));
        assert!(record.legacy_media_url.is_none());
        assert_eq!(record.tags, vec!["Emergency Care", "First Aid"]);
        assert_eq!(
            record.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 11, 15, 10, 0, 0).unwrap())
        );
        assert_eq!(record.channel.as_deref(), Some("American Heart Association"));
    }

    #[test]
    fn test_unparsable_timestamp_does_not_fail_load() {
        let json = r#"{"id": "a", "type": "video", "videoId": "x",
                       "thumbnail": "t.jpg", "updatedAt": "not a date"}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert!(record.updated_at.is_none());

        let json = r#"{"id": "b", "type": "video", "videoId": "x", "thumbnail": "t.jpg"}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert!(record.updated_at.is_none());

        let json = r#"{"id": "c", "type": "video", "videoId": "x",
                       "thumbnail": "t.jpg", "updatedAt": {"seconds": 12}}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let json = r#"{"id": "a", "type": "video", "videoId": "x",
                       "thumbnail": "t.jpg", "updatedAt": "2024-11-15T10:00:00"}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 11, 15, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_epoch_millis_timestamp() {
        let json = r#"{"id": "a", "type": "video", "videoId": "x",
                       "thumbnail": "t.jpg", "updatedAt": 1700000000000}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.updated_at.map(|dt| dt.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let json = r#"{"id": "a", "type": "podcast", "thumbnail": "t.jpg"}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, ContentKind::Other("podcast".to_string()));
        assert!(!record.is_playable());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "podcast");
    }

    #[test]
    fn test_media_source_prefers_primary_ref() {
        let mut record = ContentRecord::video("a", "A", "abc123", "t.jpg", None);
        record.legacy_media_url = Some("https://cdn.example.com/a.mp4".to_string());
        assert_eq!(record.media_source(), Some(MediaSource::Embedded("abc123")));

        record.primary_media_ref = None;
        assert_eq!(
            record.media_source(),
            Some(MediaSource::Direct("https://cdn.example.com/a.mp4"))
        );

        record.legacy_media_url = None;
        assert_eq!(record.media_source(), None);
        assert!(!record.is_playable());
    }

    #[test]
    fn test_serialize_uses_catalog_keys() {
        let updated = Utc.with_ymd_and_hms(2024, 12, 5, 8, 0, 0).unwrap();
        let record = ContentRecord::video("a", "A", "abc123", "t.jpg", Some(updated));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "video");
        assert_eq!(value["videoId"], "abc123");
        assert_eq!(value["thumbnail"], "t.jpg");
        assert_eq!(value["updatedAt"], "2024-12-05T08:00:00.000Z");
        assert!(value.get("mediaUrl").is_none());
    }

    struct StaticSource(Vec<ContentRecord>);

    #[async_trait]
    impl ContentSource for StaticSource {
        fn id(&self) -> &'static str {
            "static"
        }

        fn name(&self) -> &'static str {
            "Static"
        }

        async fn load(&self) -> Result<Vec<ContentRecord>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_content_source_as_trait_object() {
        let source: Box<dyn ContentSource> = Box::new(StaticSource(vec![
            ContentRecord::video("first", "First", "a", "a.jpg", None),
            ContentRecord::video("second", "Second", "b", "b.jpg", None),
        ]));

        let records = source.load().await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
