//! anime_title_resolver - Resolve noisy anime release titles against TMDB
//!
//! This library turns titles taken from release feeds (for example
//! `"Hunter x Hunter (2011)"`) into canonical TMDB records, formats the
//! display name used by the rename pipeline, and looks up per-episode titles
//! for a resolved series.

mod catalog;
mod config;
mod entry;
mod naming;
mod resolver;
mod title;

use std::sync::Arc;
use thiserror::Error;

// Re-export error types
pub use catalog::CatalogError;
pub use config::ConfigError;

pub use catalog::{
    ANIMATION_GENRE_ID, CatalogParams, CatalogSearchClient, CatalogTransport, DEFAULT_BASE_URL,
    EpisodeTitleFetcher, EpisodeTitleMap, MediaRecord, MediaType, REQUEST_TIMEOUT,
    ReqwestTransport, SearchHit, SearchOutcome, TransportResponse, rank_candidates,
};
pub use config::{API_KEY_ENV, Config, RenameConfig, TmdbConfig, default_config_path};
pub use entry::AnimeEntry;
pub use naming::{EPISODE_TITLE_PLACEHOLDER, sanitize_name, template_uses_episode_title};
pub use resolver::{ResolutionService, format_display_name};
pub use title::{NormalizedTitle, normalize_title};

/// Top-level error type for setting up a resolver
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while setting up the catalog client
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Resolution and episode-title lookup sharing one catalog transport.
///
/// # Examples
///
/// ```no_run
/// use anime_title_resolver::{AnimeEntry, Config, TitleResolver};
///
/// let config = Config::load().unwrap();
/// let resolver = TitleResolver::from_config(&config).unwrap();
///
/// let mut entry = AnimeEntry::new("Sousou no Frieren (2023)");
/// let name = resolver.resolve_display_name(&mut entry);
/// let titles = resolver.episode_titles(&entry);
/// println!("{} has {} titled episodes", name, titles.len());
/// ```
pub struct TitleResolver {
    resolution: ResolutionService,
    episodes: EpisodeTitleFetcher,
    rename_template: String,
}

impl TitleResolver {
    /// Builds a resolver talking to the configured TMDB endpoint.
    pub fn from_config(config: &Config) -> Result<Self, ResolverError> {
        let transport = Arc::new(ReqwestTransport::new(&config.tmdb.base_url)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Builds a resolver on top of an existing transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn CatalogTransport>) -> Self {
        let params = config.catalog_params();
        let search = CatalogSearchClient::new(Arc::clone(&transport), params.clone());

        Self {
            resolution: ResolutionService::new(search, config.tmdb.expose_tmdb_id),
            episodes: EpisodeTitleFetcher::new(transport, params),
            rename_template: config.rename.template.clone(),
        }
    }

    /// Resolves `entry`, attaching the record to it. See `ResolutionService::resolve`.
    pub fn resolve(&self, entry: &mut AnimeEntry) -> Option<MediaRecord> {
        self.resolution.resolve(entry)
    }

    /// Resolves `entry` and returns its display name, or an empty string.
    pub fn resolve_display_name(&self, entry: &mut AnimeEntry) -> String {
        self.resolution.resolve_display_name(entry)
    }

    /// Episode titles for a resolved entry, when the rename template uses them.
    pub fn episode_titles(&self, entry: &AnimeEntry) -> EpisodeTitleMap {
        self.episodes.episode_titles_for(entry, &self.rename_template)
    }

    /// Episode titles for a record and season, without any gating.
    pub fn fetch_episode_titles(&self, record: &MediaRecord, season: u32) -> EpisodeTitleMap {
        self.episodes.fetch_episode_titles(record, season)
    }
}
