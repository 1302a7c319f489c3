use crate::models::{Ranked, Scored};

/// Order by score descending and assign 1-based positions.
///
/// The sort is stable: items with equal scores keep their input order, so
/// for aggregates the group seen first in the fetched data ranks higher.
/// Ranks are always contiguous `1..=N`, ties included.
pub fn rank<T: Scored>(mut items: Vec<T>) -> Vec<Ranked<T>> {
    items.sort_by(|a, b| b.score().cmp(&a.score()));

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Ranked {
            rank: i as u32 + 1,
            item,
        })
        .collect()
}
