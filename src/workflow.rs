//! Chapter selection helpers shared by the CLI actions.

use crate::library::Series;
use crate::site::{RemoteChapter, RemoteSeries};
use crate::template::NumericKey;

/// Returns the remote chapters whose key is not present in `local`.
///
/// Keys are compared by value, so a local `010` counts as remote `10`. The
/// result keeps the remote order.
#[must_use]
pub fn missing_chapters<'a>(local: &Series, remote: &'a [RemoteChapter]) -> Vec<&'a RemoteChapter> {
    remote
        .iter()
        .filter(|chapter| !local.has_chapter(&chapter.key))
        .collect()
}

/// Picks the requested chapters out of `remote`.
///
/// An empty `wanted` selects every chapter. Returns the selection in remote
/// order together with the requested keys that matched nothing.
#[must_use]
pub fn select_chapters<'a>(
    remote: &'a [RemoteChapter],
    wanted: &[NumericKey],
) -> (Vec<&'a RemoteChapter>, Vec<NumericKey>) {
    if wanted.is_empty() {
        return (remote.iter().collect(), Vec::new());
    }
    let selected = remote
        .iter()
        .filter(|chapter| wanted.iter().any(|key| key.numeric_eq(&chapter.key)))
        .collect();
    let unmatched = wanted
        .iter()
        .filter(|key| !remote.iter().any(|chapter| chapter.key.numeric_eq(key)))
        .cloned()
        .collect();
    (selected, unmatched)
}

/// Chooses the search result to act on: an exact (case-insensitive) title or
/// alternative-title match if there is one, otherwise the first result.
#[must_use]
pub fn best_match<'a>(results: &'a [RemoteSeries], title: &str) -> Option<&'a RemoteSeries> {
    let wanted = title.trim().to_lowercase();
    results
        .iter()
        .find(|series| {
            std::iter::once(&series.title)
                .chain(&series.alt_titles)
                .any(|t| t.to_lowercase() == wanted)
        })
        .or_else(|| results.first())
}
