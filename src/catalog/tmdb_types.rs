/// TMDB API response types for deserialization.
///
/// These structures mirror the subset of the TMDB JSON responses we read.
use serde::Deserialize;

/// Response of the `search/tv` and `search/movie` endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSearchResponse {
    pub results: Vec<TmdbSearchResult>,
}

/// TMDB identifiers are numbers, but we keep them as opaque strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TmdbId {
    Number(u64),
    Text(String),
}

impl From<TmdbId> for String {
    fn from(id: TmdbId) -> Self {
        match id {
            TmdbId::Number(n) => n.to_string(),
            TmdbId::Text(s) => s,
        }
    }
}

/// A single search result. Series use `name`/`first_air_date`, movies use
/// `title`/`release_date`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSearchResult {
    pub id: TmdbId,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Response of the `tv/{id}/season/{season}` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSeasonResponse {
    pub episodes: Vec<TmdbEpisode>,
}

/// A single episode in a season listing.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbEpisode {
    pub season_number: u32,
    pub episode_number: u32,
    pub name: String,
}
