//! Title resolution
//!
//! Ties title cleanup, catalog search and ranking together and attaches the
//! result to the requesting entry.

use crate::catalog::{CatalogError, CatalogSearchClient, MediaRecord, MediaType, rank_candidates};
use crate::entry::AnimeEntry;
use crate::title::normalize_title;
use chrono::Datelike;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info};

/// Process-wide resolution lock.
///
/// Held for the full duration of every resolution, network round trips and
/// narrowing pauses included, so that at most one resolution talks to the
/// catalog at any time. This is the throttle that keeps us within the
/// catalog's rate limits; episode title lookups do not take it.
static RESOLUTION_LOCK: Mutex<()> = Mutex::new(());

/// Resolves entries to catalog records.
pub struct ResolutionService {
    search: CatalogSearchClient,
    expose_tmdb_id: bool,
}

impl ResolutionService {
    /// Creates a service; `expose_tmdb_id` appends ` [tmdbid=ID]` to display names.
    pub fn new(search: CatalogSearchClient, expose_tmdb_id: bool) -> Self {
        Self {
            search,
            expose_tmdb_id,
        }
    }

    /// Resolves `entry` and stores the outcome on it.
    ///
    /// The entry's previous record is replaced by the new one, or cleared
    /// when nothing could be resolved. Catalog failures are logged and
    /// reported as `None`.
    pub fn resolve(&self, entry: &mut AnimeEntry) -> Option<MediaRecord> {
        let _guard = RESOLUTION_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let normalized = normalize_title(&entry.title);

        let record = if normalized.is_empty() {
            debug!(raw = %entry.title, "Title is empty after cleanup, not searching");
            None
        } else {
            self.lookup(&normalized.title, entry.media_type())
        };

        entry.set_media_record(record.clone());
        record
    }

    /// Resolves `entry` and returns the name to use for it.
    ///
    /// Returns an empty string when nothing could be resolved.
    pub fn resolve_display_name(&self, entry: &mut AnimeEntry) -> String {
        let had_year = normalize_title(&entry.title).had_year;

        match self.resolve(entry) {
            Some(record) => format_display_name(&record, had_year, self.expose_tmdb_id),
            None => String::new(),
        }
    }

    fn lookup(&self, title: &str, media_type: MediaType) -> Option<MediaRecord> {
        match self.try_lookup(title, media_type) {
            Ok(record) => {
                if let Some(ref record) = record {
                    info!(
                        title,
                        id = %record.id,
                        name = %record.name,
                        "Resolved title"
                    );
                }
                record
            }
            Err(CatalogError::NoMatch(query)) => {
                info!(title, %query, %media_type, "No catalog match");
                None
            }
            Err(e) => {
                error!(title, %media_type, error = %e, "Title resolution failed");
                None
            }
        }
    }

    fn try_lookup(&self, title: &str, media_type: MediaType) -> Result<Option<MediaRecord>, CatalogError> {
        let outcome = self.search.search(title, media_type)?;
        rank_candidates(&outcome.hits, &outcome.query)
    }
}

/// Formats a resolved record as a display name.
///
/// `Name`, followed by ` (YEAR)` when the raw title carried a year and the
/// record has a release date, followed by ` [tmdbid=ID]` when `expose_id` is
/// set. A record with a blank name formats as an empty string.
pub fn format_display_name(record: &MediaRecord, had_year: bool, expose_id: bool) -> String {
    if record.name.trim().is_empty() {
        return String::new();
    }

    let mut name = record.name.clone();

    if had_year {
        if let Some(date) = record.release_date {
            name.push_str(&format!(" ({})", date.year()));
        }
    }

    if expose_id {
        name.push_str(&format!(" [tmdbid={}]", record.id));
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{ScriptedTransport, TransportEvent, search_body};
    use crate::catalog::{CatalogParams, CatalogTransport};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn service(transport: Arc<dyn CatalogTransport>, expose_tmdb_id: bool) -> ResolutionService {
        let search = CatalogSearchClient::new(
            transport,
            CatalogParams {
                api_key: "key".to_string(),
                language: "zh-CN".to_string(),
            },
        )
        .with_retry_delay(Duration::ZERO);

        ResolutionService::new(search, expose_tmdb_id)
    }

    fn record(name: &str, id: &str, date: Option<NaiveDate>) -> MediaRecord {
        MediaRecord {
            id: id.to_string(),
            name: name.to_string(),
            release_date: date,
        }
    }

    #[test]
    fn test_format_with_year_and_id() {
        let record = record("Example", "123", NaiveDate::from_ymd_opt(2020, 7, 1));
        assert_eq!(
            format_display_name(&record, true, true),
            "Example (2020) [tmdbid=123]"
        );
    }

    #[test]
    fn test_format_plain_name() {
        let record = record("Example", "123", NaiveDate::from_ymd_opt(2020, 7, 1));
        assert_eq!(format_display_name(&record, false, false), "Example");
    }

    #[test]
    fn test_format_year_without_date() {
        let record = record("Example", "123", None);
        assert_eq!(format_display_name(&record, true, false), "Example");
        assert_eq!(format_display_name(&record, true, true), "Example [tmdbid=123]");
    }

    #[test]
    fn test_format_blank_name() {
        let record = record("  ", "123", None);
        assert_eq!(format_display_name(&record, true, true), "");
    }

    #[test]
    fn test_resolve_attaches_record() {
        let transport = ScriptedTransport::new(vec![Ok((
            200,
            search_body(&[(1, "Title A", &[16]), (2, "Title B", &[16])]),
        ))]);
        let mut entry = AnimeEntry::new("Title B (2020)");

        let name = service(transport.clone(), true).resolve_display_name(&mut entry);

        assert_eq!(name, "Title B (2020) [tmdbid=2]");
        assert_eq!(entry.media_record().map(|r| r.id.as_str()), Some("2"));
        assert_eq!(transport.calls()[0].param("query"), Some("Title B"));
    }

    #[test]
    fn test_resolve_movie_entry() {
        let body = r#"{"results":[{"id":99,"title":"Kimi no Na wa","release_date":"2016-08-26","genre_ids":[16,10749]}]}"#;
        let transport = ScriptedTransport::new(vec![Ok((200, body.to_string()))]);
        let mut entry = AnimeEntry::new("Kimi no Na wa").with_single_release(true);

        let name = service(transport.clone(), false).resolve_display_name(&mut entry);

        assert_eq!(name, "Kimi no Na wa");
        assert_eq!(transport.calls()[0].path, "search/movie");
    }

    #[test]
    fn test_blank_title_makes_no_request() {
        let transport = ScriptedTransport::new(vec![]);
        let service = service(transport.clone(), true);

        let mut year_only = AnimeEntry::new("[2021]");
        assert_eq!(service.resolve_display_name(&mut year_only), "");

        let mut blank = AnimeEntry::new("   ");
        assert_eq!(service.resolve_display_name(&mut blank), "");

        assert!(transport.calls().is_empty());
        assert!(year_only.media_record().is_none());
    }

    #[test]
    fn test_non_animation_only_hit_is_not_selected() {
        let transport = ScriptedTransport::new(vec![Ok((
            200,
            search_body(&[(1, "Live Action", &[18])]),
        ))]);
        let mut entry = AnimeEntry::new("Live Action");

        assert_eq!(service(transport, false).resolve(&mut entry), None);
        assert!(entry.media_record().is_none());
    }

    #[test]
    fn test_errors_clear_previous_record() {
        let transport = ScriptedTransport::new(vec![Ok((500, String::new()))]);
        let mut entry = AnimeEntry::new("Anything");
        entry.set_media_record(Some(record("Stale", "1", None)));

        let name = service(transport, true).resolve_display_name(&mut entry);

        assert_eq!(name, "");
        assert!(entry.media_record().is_none());
    }

    #[test]
    fn test_network_error_is_swallowed() {
        let transport = ScriptedTransport::new(vec![Err("connection reset".to_string())]);
        let mut entry = AnimeEntry::new("Anything");

        assert_eq!(service(transport, false).resolve(&mut entry), None);
    }

    #[test]
    fn test_exact_match_uses_narrowed_query() {
        let transport = ScriptedTransport::new(vec![
            Ok((200, search_body(&[]))),
            Ok((200, search_body(&[(1, "Haikyuu Movie", &[16]), (2, "Haikyuu", &[16])]))),
        ]);
        let mut entry = AnimeEntry::new("Haikyuu To the Top");

        let record = service(transport, false).resolve(&mut entry).unwrap();

        assert_eq!(record.id, "2");
    }

    #[test]
    fn test_concurrent_resolutions_do_not_interleave() {
        let transport = ScriptedTransport::with_latency(
            vec![
                Ok((200, search_body(&[(1, "First", &[16])]))),
                Ok((200, search_body(&[(1, "First", &[16])]))),
            ],
            Duration::from_millis(50),
        );
        let service = Arc::new(service(transport.clone(), false));

        let handles: Vec<_> = ["First", "Second"]
            .into_iter()
            .map(|title| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let mut entry = AnimeEntry::new(title);
                    service.resolve(&mut entry)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }

        let events = transport.events();
        assert_eq!(events.len(), 4);
        for pair in events.chunks(2) {
            match (&pair[0], &pair[1]) {
                (TransportEvent::Started(a), TransportEvent::Finished(b)) => assert_eq!(a, b),
                other => panic!("interleaved transport calls: {:?}", other),
            }
        }
    }
}
