//! Naming helpers shared with the rename pipeline
//!
//! Catalog names end up in file and directory names, so they are cleaned
//! before being stored on a record.

/// Placeholder the rename template uses for per-episode titles.
pub const EPISODE_TITLE_PLACEHOLDER: &str = "${episodeTitle}";

/// Cleans a catalog name for use in file names
///
/// Replaces characters that are invalid or problematic in filenames across platforms:
/// - Path separators: / \
/// - Reserved characters: : * ? " < > |
/// - Control characters
///
/// Runs of whitespace collapse to a single space, and leading/trailing
/// whitespace and dots are trimmed.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_string()
}

/// Whether a rename template would render episode titles.
pub fn template_uses_episode_title(template: &str) -> bool {
    template.contains(EPISODE_TITLE_PLACEHOLDER)
}
