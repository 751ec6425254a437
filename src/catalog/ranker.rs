/// Turns filtered search hits into a single media record.
use super::{CatalogError, MediaRecord, SearchHit};
use crate::naming::sanitize_name;
use chrono::NaiveDate;

/// Picks the best record for `query` out of `hits`.
///
/// Every hit is converted first, so a hit without any name fails the whole
/// ranking with `CatalogError::Parse`. The first record whose cleaned name
/// equals `query` exactly wins; otherwise the catalog's first result is used.
/// Returns `Ok(None)` only when `hits` is empty.
pub fn rank_candidates(hits: &[SearchHit], query: &str) -> Result<Option<MediaRecord>, CatalogError> {
    let candidates = hits
        .iter()
        .map(to_record)
        .collect::<Result<Vec<_>, _>>()?;

    let exact = candidates.iter().position(|record| record.name == query);

    Ok(match exact {
        Some(index) => candidates.into_iter().nth(index),
        None => candidates.into_iter().next(),
    })
}

fn to_record(hit: &SearchHit) -> Result<MediaRecord, CatalogError> {
    let name = hit.name.as_deref().ok_or_else(|| {
        CatalogError::Parse(format!("Search result {} has neither name nor title", hit.id))
    })?;

    Ok(MediaRecord {
        id: hit.id.clone(),
        name: sanitize_name(name),
        release_date: hit.release_date.as_deref().and_then(parse_release_date),
    })
}

/// Parses `YYYY-MM-DD`; the catalog sends an empty string for unknown dates.
fn parse_release_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}
