//! Per-season episode title lookup.
use super::tmdb_types::TmdbSeasonResponse;
use super::transport::fetch_json;
use super::{CatalogError, CatalogParams, CatalogTransport, MediaRecord};
use crate::entry::AnimeEntry;
use crate::naming::template_uses_episode_title;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Episode number to episode title, for a single season.
pub type EpisodeTitleMap = BTreeMap<u32, String>;

/// Fetches episode titles from the catalog's season listing.
///
/// Lookups are best effort: failures are logged and produce an empty map.
/// Unlike resolution, fetches are not serialized and may run concurrently.
pub struct EpisodeTitleFetcher {
    transport: Arc<dyn CatalogTransport>,
    params: CatalogParams,
}

impl EpisodeTitleFetcher {
    /// Creates a fetcher sending `params` with every season request.
    pub fn new(transport: Arc<dyn CatalogTransport>, params: CatalogParams) -> Self {
        Self { transport, params }
    }

    /// Episode titles for an entry, if its rename template needs them.
    ///
    /// Returns an empty map without touching the network for single
    /// releases, unresolved entries, records with a blank id, and templates
    /// that do not reference the episode-title placeholder.
    pub fn episode_titles_for(&self, entry: &AnimeEntry, rename_template: &str) -> EpisodeTitleMap {
        if entry.single_release {
            return EpisodeTitleMap::new();
        }

        let Some(record) = entry.media_record() else {
            return EpisodeTitleMap::new();
        };

        if record.id.trim().is_empty() {
            return EpisodeTitleMap::new();
        }

        if !template_uses_episode_title(rename_template) {
            debug!(title = %entry.title, "Rename template has no episode titles, skipping lookup");
            return EpisodeTitleMap::new();
        }

        self.fetch_episode_titles(record, entry.season)
    }

    /// Fetches the titles of every episode in `season` of `record`.
    pub fn fetch_episode_titles(&self, record: &MediaRecord, season: u32) -> EpisodeTitleMap {
        match self.try_fetch(record, season) {
            Ok(titles) => titles,
            Err(e) => {
                error!(
                    id = %record.id,
                    season,
                    error = %e,
                    "Failed to fetch episode titles"
                );
                EpisodeTitleMap::new()
            }
        }
    }

    fn try_fetch(&self, record: &MediaRecord, season: u32) -> Result<EpisodeTitleMap, CatalogError> {
        let path = format!("tv/{}/season/{}", record.id, season);
        let response: TmdbSeasonResponse =
            fetch_json(self.transport.as_ref(), &path, &self.params.common_query())?;

        let titles: EpisodeTitleMap = response
            .episodes
            .into_iter()
            .filter(|episode| episode.season_number == season)
            .map(|episode| (episode.episode_number, episode.name))
            .collect();

        debug!(id = %record.id, season, count = titles.len(), "Fetched episode titles");

        Ok(titles)
    }
}
