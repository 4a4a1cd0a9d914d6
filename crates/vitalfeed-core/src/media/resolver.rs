//! Per-record media resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::playback::PlaybackSession;
use super::thumbnail::{DegradationLevel, ThumbnailState};
use super::MediaSettings;
use crate::{ContentRecord, MediaSource, RecordId};

/// What a record's media slot renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Visual {
    /// Static preview image at the record's current degradation level
    Thumbnail(String),
    /// Embedded provider player
    ActivePlayer(String),
    /// Direct video for records without a provider reference
    LegacyVideo(String),
}

impl Visual {
    pub fn url(&self) -> &str {
        match self {
            Visual::Thumbnail(url) | Visual::ActivePlayer(url) | Visual::LegacyVideo(url) => url,
        }
    }

    pub fn is_playing(&self) -> bool {
        !matches!(self, Visual::Thumbnail(_))
    }
}

/// Session-scoped media state for every record of a feed.
///
/// Holds the [`PlaybackSession`] that enforces a single active record, and
/// thumbnail degradation created lazily on a record's first load failure.
/// All mutation goes through `&mut self`, so events are applied one at a time.
#[derive(Debug, Clone, Default)]
pub struct MediaResolver {
    settings: MediaSettings,
    session: PlaybackSession,
    thumbnails: HashMap<RecordId, ThumbnailState>,
}

impl MediaResolver {
    pub fn new(settings: MediaSettings) -> Self {
        Self {
            settings,
            session: PlaybackSession::new(),
            thumbnails: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &MediaSettings {
        &self.settings
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn active(&self) -> Option<&RecordId> {
        self.session.active()
    }

    pub fn is_active(&self, id: &RecordId) -> bool {
        self.session.is_active(id)
    }

    /// Decide what `record` renders right now.
    ///
    /// Only the active video record shows a player. Everything else shows its
    /// thumbnail, degraded as far as its reported load failures demand.
    pub fn resolve_visual(&self, record: &ContentRecord) -> Visual {
        if record.is_video() && self.session.is_active(&record.id) {
            match record.media_source() {
                Some(MediaSource::Embedded(media_ref)) => {
                    return Visual::ActivePlayer(self.settings.embed_url(media_ref));
                }
                Some(MediaSource::Direct(url)) => return Visual::LegacyVideo(url.to_string()),
                None => {}
            }
        }
        Visual::Thumbnail(self.current_thumbnail(record))
    }

    /// Toggle playback for `record` and return the new active record.
    ///
    /// Records that cannot play (not a video, or no media at all) never become
    /// active; the session is left unchanged.
    pub fn toggle_play(&mut self, record: &ContentRecord) -> Option<&RecordId> {
        if !record.is_playable() {
            return self.session.active();
        }
        self.session.toggle(&record.id)
    }

    /// Stop whatever is playing.
    pub fn stop(&mut self) -> Option<RecordId> {
        self.session.stop()
    }

    /// Advance `record`'s thumbnail one step down the fallback chain and
    /// return the URL to load next. Idempotent once the placeholder is reached.
    pub fn on_thumbnail_load_failure(&mut self, record: &ContentRecord) -> String {
        let state = self
            .thumbnails
            .entry(record.id.clone())
            .or_insert_with(|| ThumbnailState::new(record.thumbnail_url.as_str()));

        if state.primary_url() != record.thumbnail_url {
            *state = ThumbnailState::new(record.thumbnail_url.as_str());
        }

        state.advance(&self.settings);
        state.current_url(&self.settings)
    }

    /// The thumbnail URL `record` should currently display.
    pub fn current_thumbnail(&self, record: &ContentRecord) -> String {
        match self.tracked_state(record) {
            Some(state) => state.current_url(&self.settings),
            None => record.thumbnail_url.clone(),
        }
    }

    pub fn degradation_level(&self, record: &ContentRecord) -> DegradationLevel {
        self.tracked_state(record)
            .map(ThumbnailState::level)
            .unwrap_or_default()
    }

    /// Degradation state still belonging to `record`'s current identity.
    fn tracked_state(&self, record: &ContentRecord) -> Option<&ThumbnailState> {
        self.thumbnails
            .get(&record.id)
            .filter(|state| state.primary_url() == record.thumbnail_url)
    }
}
