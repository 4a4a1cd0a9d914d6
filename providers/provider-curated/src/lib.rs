//! # provider-curated
//!
//! Content sources for the Vitalfeed health education section.
//!
//! - [`CuratedCatalog`] - The built-in list of videos from trusted healthcare
//!   institutions, in display order
//! - [`JsonCatalog`] - The same record format read from a JSON file, for
//!   deployments that maintain their own list

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vitalfeed_core::media::embed::thumbnail_url;
use vitalfeed_core::prelude::*;

mod json;

pub use json::{CatalogError, JsonCatalog};

/// The built-in catalog of health education videos.
pub struct CuratedCatalog;

impl CuratedCatalog {
    pub fn new() -> Self {
        Self
    }

    fn entry(
        id: &str,
        title: &str,
        excerpt: &str,
        video_id: &str,
        tags: &[&str],
        updated_at: &str,
        channel: &str,
    ) -> ContentRecord {
        ContentRecord {
            id: RecordId::new(id),
            kind: ContentKind::Video,
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            primary_media_ref: Some(video_id.to_string()),
            legacy_media_url: None,
            thumbnail_url: thumbnail_url(video_id),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            updated_at: DateTime::parse_from_rfc3339(updated_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            channel: Some(channel.to_string()),
        }
    }

    /// Generate the static catalog records.
    fn records() -> Vec<ContentRecord> {
        vec![
            Self::entry(
                "hands-only-cpr",
                "Hands-Only CPR Instruction",
                "Learn the two simple steps to save a life with Hands-Only CPR. \
                 No mouth-to-mouth required. Essential emergency skill everyone should know.",
                "M4ACYp75mjU",
                &["Emergency Care", "First Aid"],
                "2024-11-15T10:00:00.000Z",
                "American Heart Association",
            ),
            Self::entry(
                "mayo-clinic-nutrition",
                "Mayo Clinic: Healthy Eating Basics",
                "Discover essential nutrition tips from Mayo Clinic experts. \
                 Learn about balanced meals, portion control, and making healthy food choices.",
                "yBEww8MlrEg",
                &["Nutrition", "Wellness"],
                "2024-12-01T14:30:00.000Z",
                "Mayo Clinic",
            ),
            Self::entry(
                "heart-health-exercise",
                "Heart-Healthy Exercise Routine",
                "Cardiovascular exercises to strengthen your heart and improve circulation. \
                 Safe workout routines for all fitness levels from Cleveland Clinic.",
                "JIXkf_i3kG0",
                &["Exercise", "Cardiovascular"],
                "2024-11-20T09:15:00.000Z",
                "Cleveland Clinic",
            ),
            Self::entry(
                "stress-management-techniques",
                "Stress Management Techniques",
                "Practical techniques to reduce stress and anxiety. Learn breathing exercises, \
                 mindfulness practices, and lifestyle changes for better mental wellness.",
                "CUaLqoYOUc8",
                &["Mental Health", "Wellness"],
                "2024-11-28T16:45:00.000Z",
                "Mayo Clinic",
            ),
            Self::entry(
                "sleep-improvement-tips",
                "Tips for Better Sleep",
                "Evidence-based strategies for improving sleep quality. Learn about sleep hygiene, \
                 creating the right environment, and establishing healthy sleep patterns.",
                "mpwBpNhal_M",
                &["Sleep", "Health"],
                "2024-11-25T11:20:00.000Z",
                "Cleveland Clinic",
            ),
            Self::entry(
                "diabetes-prevention-guide",
                "Type 2 Diabetes Prevention",
                "Important information about preventing Type 2 diabetes through diet, exercise, \
                 and lifestyle modifications. Learn about early warning signs and risk factors.",
                "V-1bOCr2XK8",
                &["Diabetes", "Prevention"],
                "2024-12-05T08:00:00.000Z",
                "Mayo Clinic Health System",
            ),
        ]
    }
}

impl Default for CuratedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSource for CuratedCatalog {
    fn id(&self) -> &'static str {
        "curated"
    }

    fn name(&self) -> &'static str {
        "Curated Health Videos"
    }

    async fn load(&self) -> Result<Vec<ContentRecord>> {
        let records = Self::records();
        tracing::debug!("Loaded {} curated record(s)", records.len());
        Ok(records)
    }
}
