//! The subscription entry that titles are resolved for.

use crate::catalog::{MediaRecord, MediaType};
use serde::{Deserialize, Serialize};

/// An anime subscription as seen by the resolver.
///
/// The entry owns at most one resolved `MediaRecord`. Resolution replaces or
/// clears it through `set_media_record`; the record itself is never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeEntry {
    /// Raw title taken from the feed, possibly carrying a year
    pub title: String,
    /// Movie or OVA rather than an episodic series
    #[serde(default)]
    pub single_release: bool,
    /// Season number used for episode title lookups
    #[serde(default = "default_season")]
    pub season: u32,
    #[serde(default)]
    media_record: Option<MediaRecord>,
}

fn default_season() -> u32 {
    1
}

impl AnimeEntry {
    /// Creates an unresolved episodic entry for season 1.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            single_release: false,
            season: default_season(),
            media_record: None,
        }
    }

    pub fn with_single_release(mut self, single_release: bool) -> Self {
        self.single_release = single_release;
        self
    }

    pub fn with_season(mut self, season: u32) -> Self {
        self.season = season;
        self
    }

    pub fn media_type(&self) -> MediaType {
        MediaType::from_single_release(self.single_release)
    }

    pub fn media_record(&self) -> Option<&MediaRecord> {
        self.media_record.as_ref()
    }

    /// Replaces the attached record, or clears it with `None`.
    pub fn set_media_record(&mut self, record: Option<MediaRecord>) {
        self.media_record = record;
    }
}
