//! Local filtering of the fetched result set

use super::types::SearchResult;

/// Keep entries whose phrase or subtext contains `query`, ignoring case.
///
/// Order of the input is preserved.
pub fn filter_matches(query: &str, entries: &[SearchResult]) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.phrase.to_lowercase().contains(&needle)
                || entry.subtext.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
