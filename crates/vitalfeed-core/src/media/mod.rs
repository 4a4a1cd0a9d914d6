//! # Media Resolution
//!
//! Decides what each record shows in its media slot: a thumbnail image, an
//! embedded player, or a direct video.
//!
//! - [`embed`] - Provider URL templates (embed, watch, thumbnail)
//! - [`thumbnail`] - The primary -> secondary -> placeholder fallback chain
//! - [`playback`] - The single active record of a session
//! - [`resolver`] - [`MediaResolver`], which combines the three per record

use serde::{Deserialize, Serialize};

pub mod embed;
pub mod playback;
pub mod resolver;
pub mod thumbnail;

pub use playback::PlaybackSession;
pub use resolver::{MediaResolver, Visual};
pub use thumbnail::{DegradationLevel, ThumbnailState};

/// Provider URLs and thumbnail fallbacks used by the resolver.
///
/// Defaults target YouTube embeds with a stock placeholder image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Base of embeddable player URLs; the media reference is appended as a path segment
    pub embed_base: String,
    /// Base of watch links; the media reference goes in the `v` query parameter
    pub watch_base: String,
    /// Suffix of the preferred thumbnail rendition
    pub primary_thumbnail_suffix: String,
    /// Suffix substituted after the preferred rendition fails to load
    pub secondary_thumbnail_suffix: String,
    /// Always-available image shown once every rendition has failed
    pub placeholder_url: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            embed_base: embed::DEFAULT_EMBED_BASE.to_string(),
            watch_base: embed::DEFAULT_WATCH_BASE.to_string(),
            primary_thumbnail_suffix: thumbnail::PRIMARY_THUMBNAIL_SUFFIX.to_string(),
            secondary_thumbnail_suffix: thumbnail::SECONDARY_THUMBNAIL_SUFFIX.to_string(),
            placeholder_url: thumbnail::PLACEHOLDER_THUMBNAIL_URL.to_string(),
        }
    }
}

impl MediaSettings {
    pub fn embed_url(&self, media_ref: &str) -> String {
        embed::build_embed_url(&self.embed_base, media_ref)
    }

    pub fn watch_url(&self, media_ref: &str) -> String {
        embed::build_watch_url(&self.watch_base, media_ref)
    }

    /// The secondary rendition of `primary_url`, if it uses the primary suffix.
    pub fn secondary_thumbnail(&self, primary_url: &str) -> Option<String> {
        if self.primary_thumbnail_suffix.is_empty()
            || !primary_url.contains(&self.primary_thumbnail_suffix)
        {
            return None;
        }
        Some(primary_url.replacen(
            &self.primary_thumbnail_suffix,
            &self.secondary_thumbnail_suffix,
            1,
        ))
    }
}
