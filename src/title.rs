//! Cleanup of raw feed titles before searching

use regex::Regex;
use std::sync::OnceLock;

/// A run of ASCII digits, optionally wrapped in (), [], （） or 【】.
///
/// `regex` has no lookaround, so whether the run is a standalone four digit
/// year is decided in `is_year` by looking at the characters around it.
const YEAR_PATTERN: &str = r"[(\[（【]?(?P<digits>[0-9]+)[)\]）】]?";

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(YEAR_PATTERN).expect("Invalid regex pattern defined in code"))
}

/// A title ready to be used as a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    /// Title without year annotations, trimmed
    pub title: String,
    /// Whether the raw title carried a year
    pub had_year: bool,
}

impl NormalizedTitle {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }
}

/// Exactly four digits, not glued to a Latin letter or digit on either side.
///
/// CJK text may touch the digits directly (`鬼灭之刃2019`), while `1080p`
/// and `S2020` are left alone.
fn is_year(raw: &str, start: usize, end: usize) -> bool {
    let attached = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());

    end - start == 4
        && !attached(raw[..start].chars().next_back())
        && !attached(raw[end..].chars().next())
}

/// Removes every year annotation from `raw` and trims the result.
///
/// Only the year token and its brackets are removed; surrounding spaces stay,
/// so `"Foo 2020 Bar"` becomes `"Foo  Bar"`.
pub fn normalize_title(raw: &str) -> NormalizedTitle {
    let raw = raw.trim();

    let mut title = String::with_capacity(raw.len());
    let mut last = 0;
    let mut had_year = false;

    for caps in year_regex().captures_iter(raw) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.name("digits")) else {
            continue;
        };

        if !is_year(raw, digits.start(), digits.end()) {
            continue;
        }

        title.push_str(&raw[last..whole.start()]);
        last = whole.end();
        had_year = true;
    }
    title.push_str(&raw[last..]);

    NormalizedTitle {
        title: title.trim().to_string(),
        had_year,
    }
}
