//! # Feed
//!
//! The rendering surface of the health video section. A [`Feed`] owns the
//! loaded records and the session's [`MediaResolver`], turns them into
//! [`Card`]s on every render pass, and forwards play clicks and thumbnail
//! load failures to the resolver.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};
use vitalfeed_core::freshness::format_relative_time_opt;
use vitalfeed_core::prelude::*;

/// The view model of one record for a single render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: RecordId,
    pub title: String,
    pub excerpt: String,
    pub channel: Option<String>,
    pub tags: Vec<String>,
    /// "Updated X ago" label relative to the render instant
    pub age_label: String,
    pub visual: Visual,
    /// Non-embedded watch link, for records with a provider media reference
    pub watch_url: Option<String>,
    /// Whether a play control is shown for this record
    pub playable: bool,
}

/// The records of a session plus their media state.
pub struct Feed {
    records: Vec<ContentRecord>,
    index: HashMap<RecordId, usize>,
    resolver: MediaResolver,
}

impl Feed {
    /// Build a feed from records in display order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DuplicateRecord`] if two records share an id.
    pub fn new(records: Vec<ContentRecord>, settings: MediaSettings) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(ContentError::DuplicateRecord(record.id.to_string()));
            }
            if record.is_video() && record.media_source().is_none() {
                warn!(
                    "Video record '{}' has neither videoId nor mediaUrl; it will not be playable",
                    record.id
                );
            }
        }

        Ok(Self {
            records,
            index,
            resolver: MediaResolver::new(settings),
        })
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&ContentRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn resolver(&self) -> &MediaResolver {
        &self.resolver
    }

    /// Render every record against `now`, in display order.
    pub fn render(&self, now: DateTime<Utc>) -> Vec<Card> {
        self.records
            .iter()
            .map(|record| self.card(record, now))
            .collect()
    }

    /// Render a single record.
    pub fn render_one(&self, id: &RecordId, now: DateTime<Utc>) -> Result<Card> {
        let record = self.lookup(id)?;
        Ok(self.card(record, now))
    }

    /// Handle a click on a record's play control.
    ///
    /// Returns the record that is active afterwards, if any.
    pub fn play(&mut self, id: &RecordId) -> Result<Option<RecordId>> {
        let position = self.position(id)?;
        let record = &self.records[position];

        if !record.is_playable() {
            warn!("Ignoring play request for non-playable record '{}'", id);
        }

        let active = self.resolver.toggle_play(record).cloned();
        debug!("Active record after toggling '{}': {:?}", id, active);
        Ok(active)
    }

    /// Stop whatever is playing.
    pub fn stop(&mut self) -> Option<RecordId> {
        self.resolver.stop()
    }

    /// Handle an image error event for a record's thumbnail.
    ///
    /// Returns the URL the image element should load next.
    pub fn thumbnail_failed(&mut self, id: &RecordId) -> Result<String> {
        let position = self.position(id)?;
        let record = &self.records[position];

        let next = self.resolver.on_thumbnail_load_failure(record);
        debug!(
            "Thumbnail for '{}' failed, now at {:?}: {}",
            id,
            self.resolver.degradation_level(record),
            next
        );
        Ok(next)
    }

    fn card(&self, record: &ContentRecord, now: DateTime<Utc>) -> Card {
        let settings = self.resolver.settings();
        Card {
            id: record.id.clone(),
            title: record.title.clone(),
            excerpt: record.excerpt.clone(),
            channel: record.channel.clone(),
            tags: record.tags.clone(),
            age_label: format_relative_time_opt(now, record.updated_at),
            visual: self.resolver.resolve_visual(record),
            watch_url: record
                .primary_media_ref
                .as_deref()
                .map(|media_ref| settings.watch_url(media_ref)),
            playable: record.is_playable(),
        }
    }

    fn lookup(&self, id: &RecordId) -> Result<&ContentRecord> {
        self.get(id)
            .ok_or_else(|| ContentError::RecordNotFound(id.to_string()))
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ContentError::RecordNotFound(id.to_string()))
    }
}
