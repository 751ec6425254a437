/// Data structures and traits for TMDB catalog lookups.
///
/// This module provides the records produced by resolving an anime title
/// against the catalog, the transport seam used to talk to it, and the
/// search, ranking and episode-title components built on top of it.
mod episodes;
mod ranker;
mod search;
mod tmdb_types;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use episodes::{EpisodeTitleFetcher, EpisodeTitleMap};
pub use ranker::rank_candidates;
pub use search::{CatalogSearchClient, SearchHit, SearchOutcome};
pub use transport::{
    CatalogTransport, DEFAULT_BASE_URL, REQUEST_TIMEOUT, ReqwestTransport, TransportResponse,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// TMDB genre id for "Animation".
pub const ANIMATION_GENRE_ID: u32 = 16;

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response (connect failure, timeout, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The catalog answered with a non-success HTTP status
    #[error("Catalog returned HTTP status {status}")]
    Status { status: u16 },

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Nothing usable was left after filtering and narrowing
    #[error("No animation match found for: {0}")]
    NoMatch(String),
}

/// Kind of catalog entry to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Episodic release, searched as `tv`
    Series,
    /// Single release (movie or OVA), searched as `movie`
    Movie,
}

impl MediaType {
    /// Derives the media type from an entry's single-release flag.
    pub fn from_single_release(single_release: bool) -> Self {
        if single_release {
            MediaType::Movie
        } else {
            MediaType::Series
        }
    }

    /// Path segment used by the catalog's search resource.
    pub fn path_segment(self) -> &'static str {
        match self {
            MediaType::Series => "tv",
            MediaType::Movie => "movie",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Catalog identifier, kept exactly as the catalog reported it
    pub id: String,
    /// Canonical name, already cleaned for use in file names
    pub name: String,
    /// First air date for series, release date for movies
    pub release_date: Option<NaiveDate>,
}

/// Query parameters shared by every catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogParams {
    /// API credential sent as `api_key`
    pub api_key: String,
    /// Result language sent as `language`
    pub language: String,
}

impl CatalogParams {
    /// Builds the `api_key`/`include_adult`/`language` triple.
    pub(crate) fn common_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api_key", self.api_key.clone()),
            ("include_adult", "true".to_string()),
            ("language", self.language.clone()),
        ]
    }
}
