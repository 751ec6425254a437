/// Catalog search with genre filtering and query narrowing.
use super::tmdb_types::{TmdbSearchResponse, TmdbSearchResult};
use super::transport::fetch_json;
use super::{ANIMATION_GENRE_ID, CatalogError, CatalogParams, CatalogTransport, MediaType};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Pause between a fruitless attempt and its narrowed retry.
pub const NARROWING_RETRY_DELAY: Duration = Duration::from_millis(500);

/// One result of a catalog search, before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Catalog identifier
    pub id: String,
    /// Series `name`, or movie `title` when no series name is present
    pub name: Option<String>,
    /// Series `first_air_date`, or movie `release_date`
    pub release_date: Option<String>,
    /// Genre ids as reported by the catalog (may be absent)
    pub genre_ids: Option<Vec<u32>>,
}

impl SearchHit {
    /// Whether this hit is tagged as animation.
    ///
    /// Missing or empty genre data never counts as a match.
    pub fn is_animation(&self) -> bool {
        self.genre_ids
            .as_ref()
            .is_some_and(|ids| ids.contains(&ANIMATION_GENRE_ID))
    }
}

impl From<TmdbSearchResult> for SearchHit {
    fn from(result: TmdbSearchResult) -> Self {
        Self {
            id: result.id.into(),
            name: result.name.or(result.title),
            release_date: result.first_air_date.or(result.release_date),
            genre_ids: result.genre_ids,
        }
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The query used by the attempt that produced `hits`
    pub query: String,
    /// Animation hits in catalog relevance order, never empty
    pub hits: Vec<SearchHit>,
}

/// Client for the catalog's `search/{type}` resource.
pub struct CatalogSearchClient {
    transport: Arc<dyn CatalogTransport>,
    params: CatalogParams,
    retry_delay: Duration,
}

impl CatalogSearchClient {
    /// Creates a search client using the default narrowing delay.
    pub fn new(transport: Arc<dyn CatalogTransport>, params: CatalogParams) -> Self {
        Self {
            transport,
            params,
            retry_delay: NARROWING_RETRY_DELAY,
        }
    }

    /// Overrides the pause between narrowing attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Searches for animation entries matching `title`.
    ///
    /// When an attempt yields no animation hits and the query still contains
    /// whitespace, the search is repeated with the first word of the query
    /// only. A query without whitespace ends the search with
    /// `CatalogError::NoMatch`. Transport and parse failures are returned
    /// immediately.
    pub fn search(&self, title: &str, media_type: MediaType) -> Result<SearchOutcome, CatalogError> {
        let mut query = title.to_string();

        loop {
            let hits: Vec<SearchHit> = self
                .search_once(&query, media_type)?
                .into_iter()
                .filter(SearchHit::is_animation)
                .collect();

            if !hits.is_empty() {
                return Ok(SearchOutcome { query, hits });
            }

            let Some(first_word) = narrow_query(&query) else {
                return Err(CatalogError::NoMatch(query));
            };

            debug!(
                from = %query,
                to = %first_word,
                "No animation results, narrowing query"
            );

            thread::sleep(self.retry_delay);
            query = first_word;
        }
    }

    /// Performs a single search request without any filtering.
    fn search_once(&self, query: &str, media_type: MediaType) -> Result<Vec<SearchHit>, CatalogError> {
        let path = format!("search/{}", media_type.path_segment());

        let mut params = vec![("query", query.to_string())];
        params.extend(self.params.common_query());

        let response: TmdbSearchResponse = fetch_json(self.transport.as_ref(), &path, &params)?;

        debug!(
            query,
            %media_type,
            count = response.results.len(),
            "Catalog search returned"
        );

        Ok(response.results.into_iter().map(SearchHit::from).collect())
    }
}

/// Returns the first whitespace-delimited word of a query that still has
/// more than one, or `None` when no narrowing is possible.
fn narrow_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if !trimmed.contains(char::is_whitespace) {
        return None;
    }

    trimmed.split_whitespace().next().map(str::to_string)
}
