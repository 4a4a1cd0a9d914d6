//! Single active player per session.

use crate::RecordId;

/// Owns the one record, if any, currently showing a player instead of its
/// thumbnail. Activating a record deactivates the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSession {
    active: Option<RecordId>,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&RecordId> {
        self.active.as_ref()
    }

    pub fn is_active(&self, id: &RecordId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Toggle `id` and return the new active record.
    ///
    /// Toggling the active record turns playback off; toggling any other
    /// record makes it the sole active one.
    pub fn toggle(&mut self, id: &RecordId) -> Option<&RecordId> {
        if self.is_active(id) {
            self.active = None;
        } else {
            self.active = Some(id.clone());
        }
        self.active.as_ref()
    }

    /// Deactivate whatever is playing, returning it.
    pub fn stop(&mut self) -> Option<RecordId> {
        self.active.take()
    }
}
