//! Historical lower bound shared by all Minecraft sources

/// Oldest Minecraft version served. Upstream lists are newest-first, so
/// everything after this id is older and dropped.
pub const OLDEST_VERSION: &str = "1.7.10";

/// Keeps items up to and including the first one matching `is_sentinel`.
pub fn take_until_inclusive<I, F>(items: I, mut is_sentinel: F) -> Vec<I::Item>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> bool,
{
    let mut kept = Vec::new();
    for item in items {
        let stop = is_sentinel(&item);
        kept.push(item);
        if stop {
            break;
        }
    }
    kept
}

/// [`take_until_inclusive`] with [`OLDEST_VERSION`] as the sentinel
pub fn take_until_oldest<I, F>(items: I, mut version_of: F) -> Vec<I::Item>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> &str,
{
    take_until_inclusive(items, |item| version_of(item) == OLDEST_VERSION)
}
