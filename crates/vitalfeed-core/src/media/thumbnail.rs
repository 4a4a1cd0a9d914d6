//! Thumbnail fallback chain.
//!
//! A record's thumbnail starts at [`DegradationLevel::Primary`]. Each load
//! failure reported by the renderer moves it one level down the chain; the
//! placeholder is terminal.

use serde::{Deserialize, Serialize};

use super::MediaSettings;

pub const PRIMARY_THUMBNAIL_SUFFIX: &str = "maxresdefault.jpg";
pub const SECONDARY_THUMBNAIL_SUFFIX: &str = "hqdefault.jpg";
pub const PLACEHOLDER_THUMBNAIL_URL: &str =
    "https://images.unsplash.com/photo-1505751172876-fa1923c5c528?auto=format&fit=crop&w=900&q=80";

/// Fallback stage of a record's thumbnail, ordered from best to last resort.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DegradationLevel {
    /// The URL supplied by the catalog
    #[default]
    Primary,
    /// The catalog URL with the secondary rendition suffix
    Secondary,
    /// The fixed placeholder image
    Placeholder,
}

impl DegradationLevel {
    /// The level after one more load failure. `Placeholder` maps to itself.
    pub fn next(self) -> Self {
        match self {
            DegradationLevel::Primary => DegradationLevel::Secondary,
            DegradationLevel::Secondary | DegradationLevel::Placeholder => {
                DegradationLevel::Placeholder
            }
        }
    }

    pub fn is_terminal(self) -> bool {
        self == DegradationLevel::Placeholder
    }
}

/// Degradation progress for one record's thumbnail.
///
/// Remembers the primary URL it was created from so a record whose thumbnail
/// changes can be recognized as a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailState {
    primary_url: String,
    level: DegradationLevel,
}

impl ThumbnailState {
    pub fn new(primary_url: impl Into<String>) -> Self {
        Self {
            primary_url: primary_url.into(),
            level: DegradationLevel::Primary,
        }
    }

    pub fn primary_url(&self) -> &str {
        &self.primary_url
    }

    pub fn level(&self) -> DegradationLevel {
        self.level
    }

    /// The URL to display at the current level.
    pub fn current_url(&self, settings: &MediaSettings) -> String {
        match self.level {
            DegradationLevel::Primary => self.primary_url.clone(),
            DegradationLevel::Secondary => settings
                .secondary_thumbnail(&self.primary_url)
                .unwrap_or_else(|| settings.placeholder_url.clone()),
            DegradationLevel::Placeholder => settings.placeholder_url.clone(),
        }
    }

    /// Record one load failure and return the new level.
    ///
    /// A primary URL without the primary suffix has no secondary rendition,
    /// so it falls straight through to the placeholder.
    pub fn advance(&mut self, settings: &MediaSettings) -> DegradationLevel {
        let mut next = self.level.next();
        if next == DegradationLevel::Secondary
            && settings.secondary_thumbnail(&self.primary_url).is_none()
        {
            next = DegradationLevel::Placeholder;
        }
        self.level = next;
        next
    }
}
